use admin_framework::controller::{CreateController, EditController, ListController};
use admin_framework::envelope::ListPage;
use admin_framework::mock::{MockListSource, MockSource};
use admin_framework::{ControllerErrorKind, SourceError};
use admin_sample::articles::{article_hooks, ArticleError};
use admin_sample::model::{Article, ArticleStatus};

#[tokio::test]
async fn test_create_derives_slug_from_the_title() {
    let mock = MockSource::new();
    let mut created = Article::new("Hello & Welcome", "body");
    created.id = 3;
    mock.expect_create().return_ok(created);

    let mut draft = Article::default();
    draft.title.set("en", "Hello & Welcome");
    let mut controller = CreateController::new(mock.clone(), Article::default()).with_hooks(article_hooks("en"));
    controller.create(draft).await;

    assert_eq!(mock.created_models()[0].slug, "hello-y-welcome");
    assert_eq!(controller.model().map(|a| a.id), Some(3));
    assert!(!controller.error());
    mock.verify();
}

#[tokio::test]
async fn test_update_follows_the_hook_locale() {
    let mock = MockSource::new();
    let mut article = Article::new("Launch day", "");
    article.title.set("hu", "Indulás");
    mock.expect_get().return_ok(article.clone());
    mock.expect_update().return_ok(article);

    let mut editor = EditController::new(mock.clone(), 1).with_hooks(article_hooks("hu"));
    editor.initialize().await;
    editor.update().await;

    assert_eq!(mock.requested_ids(), vec![1]);
    assert_eq!(mock.updated_models()[0].slug, "indulas");
    mock.verify();
}

#[tokio::test]
async fn test_failed_update_keeps_local_edits() {
    let mock = MockSource::new();
    mock.expect_get().return_ok(Article::new("Old", ""));
    mock.expect_update()
        .return_err(SourceError::Custom("backend down".to_string()));

    let mut editor = EditController::new(mock.clone(), 1).with_hooks(article_hooks("en"));
    editor.initialize().await;
    if let Some(article) = editor.model_mut() {
        article.title.set("en", "New");
    }
    editor.update().await;

    assert_eq!(editor.error_kind(), Some(ControllerErrorKind::FailedToUpdateModel));
    assert!(!editor.loading());
    let kept = editor.model().unwrap();
    assert_eq!(kept.title.get("en"), Some("New"));
    assert_eq!(kept.slug, "new");
    assert!(!editor.no_change());
    mock.verify();
}

#[tokio::test]
async fn test_list_of_articles() {
    let mut published = Article::new("Live", "");
    published.status = ArticleStatus::Published;
    let mock = MockListSource::new();
    mock.expect_list()
        .return_ok(ListPage::new(vec![Article::new("Draft", ""), published], 12));

    let mut list = ListController::new(mock.clone());
    list.initialize().await;

    assert_eq!(list.paginator().total_items, 12);
    let live: Vec<_> = list.list().iter().filter(|a| a.is_published()).collect();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].slug, "live");
    mock.verify();
}

#[test]
fn test_custom_source_errors_become_validation_errors() {
    let error = ArticleError::for_id(4, SourceError::Custom("title is required".to_string()));
    match error {
        ArticleError::Validation(msg) => assert_eq!(msg, "title is required"),
        other => panic!("unexpected error: {other:?}"),
    }
}
