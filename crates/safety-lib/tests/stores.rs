use safety_lib::community::DEFAULT_CATEGORY;
use safety_lib::{
    CommunityStore, Error, HotzoneStore, NewComment, NewHotzone, NewPost, Page, Result,
};
use tempfile::tempdir;

fn post(title: &str, category: Option<&str>) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: format!("{title} body"),
        author: "resident".to_string(),
        category: category.map(str::to_string),
        ..Default::default()
    }
}

#[test]
fn created_hotzone_round_trips_through_get() -> Result<()> {
    let dir = tempdir()?;
    let store = HotzoneStore::open(dir.path().join("db/hotzone.db"), false)?;

    let new = NewHotzone {
        area_name: "Seoul Station plaza".to_string(),
        description: Some("Transit hub".to_string()),
        risk_level: 4,
        latitude: Some(37.5547),
        longitude: Some(126.9707),
        radius: None,
        crime_type: None,
    };
    let id = store.create(&new)?;
    let fetched = store.get(id)?.hotzone;

    assert_eq!(fetched.id, id);
    assert_eq!(fetched.area_name, new.area_name);
    assert_eq!(fetched.description, new.description);
    assert_eq!(fetched.risk_level, 4);
    assert_eq!(fetched.latitude, 37.5547);
    assert_eq!(fetched.longitude, 126.9707);
    assert_eq!(fetched.radius, 0.5);
    assert_eq!(fetched.crime_type, None);
    assert!(!fetched.created_at.is_empty());
    Ok(())
}

#[test]
fn pagination_reports_ceil_pages_and_empty_tail() -> Result<()> {
    let dir = tempdir()?;
    let store = CommunityStore::open(dir.path().join("community.db"))?;
    for i in 0..7 {
        store.create_post(&post(&format!("post {i}"), None))?;
    }

    let page = Page::new(1, 3);
    let first = store.list_posts(None, page)?;
    assert_eq!(first.total_count, 7);
    assert_eq!(first.posts.len(), 3);
    assert_eq!(page.total_pages(first.total_count), 3);

    let last = store.list_posts(None, Page::new(3, 3))?;
    assert_eq!(last.posts.len(), 1);

    let beyond = store.list_posts(None, Page::new(9, 3))?;
    assert!(beyond.posts.is_empty());
    assert_eq!(beyond.total_count, 7);
    Ok(())
}

#[test]
fn category_filter_returns_matching_posts_newest_first() -> Result<()> {
    let dir = tempdir()?;
    let store = CommunityStore::open(dir.path().join("community.db"))?;
    store.create_post(&post("older general", None))?;
    store.create_post(&post("lost item", Some("lost-and-found")))?;
    store.create_post(&post("newer general", Some(DEFAULT_CATEGORY)))?;

    let page = store.list_posts(Some("general"), Page::default())?;
    let titles: Vec<_> = page.posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["newer general", "older general"]);
    assert!(page.posts.iter().all(|p| p.category == "general"));
    assert_eq!(page.total_count, 2);

    let everything = store.list_posts(Some("all"), Page::default())?;
    assert_eq!(everything.total_count, 3);
    Ok(())
}

#[test]
fn comments_are_attached_oldest_first() -> Result<()> {
    let dir = tempdir()?;
    let store = CommunityStore::open(dir.path().join("community.db"))?;
    let post_id = store.create_post(&post("street light out", None))?;

    for text in ["first", "second"] {
        store.add_comment(
            post_id,
            &NewComment {
                content: text.to_string(),
                author: "neighbour".to_string(),
            },
        )?;
    }

    let detail = store.get_post(post_id)?;
    assert_eq!(detail.post.content, "street light out body");
    let contents: Vec<_> = detail.comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second"]);
    Ok(())
}

#[test]
fn comment_on_missing_post_leaves_no_orphan() -> Result<()> {
    let dir = tempdir()?;
    let store = CommunityStore::open(dir.path().join("community.db"))?;

    let err = store
        .add_comment(
            77,
            &NewComment {
                content: "hello?".to_string(),
                author: "ghost".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::PostNotFound { id: 77 }));

    let conn = store.connect()?;
    let orphans: i64 = conn.query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))?;
    assert_eq!(orphans, 0);
    Ok(())
}
