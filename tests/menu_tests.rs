// tests/menu_tests.rs

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use examprep::{
    config::Config,
    menu::{
        HoverMenu, HoverState, HttpMenuSource, MenuSource, MenuTimings, MobileDrawer,
        MobileLevel, ScrollHost,
    },
    models::{exam::Exam, id::ObjectId, subject::{SortDirection, Subject}},
    news::StaticNewsSource,
    resolver::Resolver,
    routes,
    state::AppState,
    store::{ContentStore, MemoryStore},
};
use url::Url;

struct TestApp {
    base_url: Url,
    jee: Exam,
    store: Arc<MemoryStore>,
}

/// Spawns the app with one exam carrying 25 subjects.
async fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(MemoryStore::new())).await
}

async fn spawn_app_with(store: Arc<MemoryStore>) -> TestApp {
    let jee = Exam {
        id: ObjectId::new(),
        name: "JEE".to_string(),
        description: None,
        upcoming_date: None,
        subjects: vec![],
    };
    store.insert_exam(jee.clone()).await.unwrap();
    for i in 0..25 {
        store
            .insert_subject(Subject {
                id: ObjectId::new(),
                name: format!("S{:02}", i),
                exam_ids: vec![jee.id],
            })
            .await
            .unwrap();
    }

    let state = AppState {
        resolver: Resolver::new(store.clone()),
        news: Arc::new(StaticNewsSource::default()),
        config: Config::default(),
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base_url: Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap(),
        jee,
        store,
    }
}

#[derive(Default)]
struct Body {
    locked: AtomicBool,
}

impl ScrollHost for Body {
    fn suppress_scroll(&self) {
        self.locked.store(true, Ordering::SeqCst);
    }

    fn restore_scroll(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn http_source_reads_exams_and_subject_pages() {
    let app = spawn_app().await;
    let source = HttpMenuSource::new(app.base_url.clone());

    let exams = source.list_exams().await.unwrap();
    assert_eq!(exams.len(), 1);
    assert_eq!(exams[0].id, app.jee.id);

    let page = source
        .list_subjects(&app.jee.id, 3, 10, SortDirection::Asc)
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.subjects.len(), 5);
    assert_eq!(page.subjects[0].name, "S20");
}

#[tokio::test]
async fn http_source_reports_error_statuses() {
    let app = spawn_app().await;
    let source = HttpMenuSource::new(app.base_url.clone());

    let result = source
        .list_subjects(&app.jee.id, 0, 10, SortDirection::Asc)
        .await;
    assert!(matches!(
        result,
        Err(examprep::menu::MenuError::Status(400))
    ));
}

#[tokio::test]
async fn hover_menu_opens_against_the_live_api() {
    let app = spawn_app().await;
    let source: Arc<dyn MenuSource> = Arc::new(HttpMenuSource::new(app.base_url.clone()));
    let timings = MenuTimings {
        open_debounce: Duration::from_millis(20),
        close_linger: Duration::from_millis(30),
        page_size: 10,
    };
    let menu = HoverMenu::spawn(source, timings);

    menu.pointer_enter_exam(app.jee.id);
    let mut snapshot = None;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let snap = menu.snapshot().await.unwrap();
        if snap.subjects.is_some() {
            snapshot = Some(snap);
            break;
        }
    }
    let snap = snapshot.expect("subjects never loaded");
    assert_eq!(snap.state, HoverState::ExamOpen { exam: app.jee.id });
    assert_eq!(snap.subjects.unwrap().subjects.len(), 10);

    menu.shutdown().await;
}

#[tokio::test]
async fn mobile_drawer_drills_down_and_back() {
    let app = spawn_app().await;
    let source: Arc<dyn MenuSource> = Arc::new(HttpMenuSource::new(app.base_url.clone()));
    let body = Arc::new(Body::default());
    let mut drawer = MobileDrawer::new(source, body.clone(), MenuTimings::default());

    drawer.open();
    assert!(body.locked.load(Ordering::SeqCst));
    drawer.next_update().await;

    let jee = drawer.exams()[0].clone();
    drawer.select_exam(jee.clone());
    drawer.next_update().await;
    drawer.next_page();
    drawer.next_update().await;
    let page = drawer.subjects().unwrap();
    assert_eq!(page.page, 2);
    let first = page.subjects[0].clone();
    assert_eq!(first.name, "S10");

    drawer.select_subject(first.clone());
    let actions = drawer.actions();
    assert_eq!(
        actions[1].href,
        format!("/exam/{}/{}/previous-year", jee.id, first.id)
    );

    drawer.back();
    drawer.back();
    assert_eq!(drawer.level(), &MobileLevel::Root);

    let href = drawer.follow_link(&actions[0]);
    assert!(href.ends_with("/chapters"));
    assert!(!body.locked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn mobile_drawer_stays_responsive_on_a_slow_api() {
    let store = Arc::new(MemoryStore::new().with_read_delay(Duration::from_millis(300)));
    let app = spawn_app_with(store).await;
    let source: Arc<dyn MenuSource> = Arc::new(HttpMenuSource::new(app.base_url.clone()));
    let mut drawer = MobileDrawer::new(source, Arc::new(Body::default()), MenuTimings::default());

    drawer.open();
    drawer.next_update().await;
    let jee = drawer.exams()[0].clone();

    let tapped = std::time::Instant::now();
    drawer.select_exam(jee.clone());
    assert_eq!(drawer.level(), &MobileLevel::Exam(jee.clone()));
    drawer.back();
    assert_eq!(drawer.level(), &MobileLevel::Root);
    assert!(tapped.elapsed() < Duration::from_millis(300));

    drawer.next_update().await;
    let reads = app.store.read_calls.load(Ordering::SeqCst);

    drawer.select_exam(jee);
    assert_eq!(drawer.subjects().unwrap().total, 25);
    assert_eq!(drawer.apply_pending(), 0);
    assert_eq!(app.store.read_calls.load(Ordering::SeqCst), reads);
}
