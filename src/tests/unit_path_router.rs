use crate::error::WikiError;
use crate::features::pages::route::PathRouter;

#[test]
fn test_valid_paths_yield_title() {
    let router = PathRouter::new().unwrap();

    assert_eq!(router.title("/view/FrontPage").unwrap().as_str(), "FrontPage");
    assert_eq!(router.title("/edit/abc123").unwrap().as_str(), "abc123");
    assert_eq!(router.title("/save/X").unwrap().as_str(), "X");
}

#[test]
fn test_invalid_paths_are_rejected() {
    let router = PathRouter::new().unwrap();

    let invalid = [
        "/",
        "/view",
        "/view/",
        "/view/Foo/",
        "/view/Foo/bar",
        "/view/Foo.txt",
        "/view/Foo%20Bar",
        "/view/../secret",
        "/delete/Foo",
        "/VIEW/Foo",
        "view/Foo",
        "/view/Foo?x=1",
        "//view/Foo",
    ];

    for path in invalid {
        assert!(
            matches!(router.title(path), Err(WikiError::InvalidPath(_))),
            "{path} should not match"
        );
    }
}
