use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct PlanBody {
    start_weight: f64,
    target_weight: f64,
    start_date: i64,
    attack_days: u32,
    cruise_days: u32,
    consolidation_days: u32,
    rhythm: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct LogEntry {
    date: i64,
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    date: String,
    day: i64,
    phase: String,
    current_weight: f64,
    weight_lost: String,
    water_today: u8,
    logs: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
struct WaterBody {
    date: String,
    count: u8,
}

#[derive(Debug, Deserialize)]
struct StateBody {
    plan: Option<serde_json::Value>,
    logs: Vec<LogEntry>,
    water: BTreeMap<String, u8>,
}

#[derive(Debug, Deserialize)]
struct FoodBody {
    name: String,
    phase: String,
    category: String,
}

#[derive(Debug, Deserialize)]
struct RecipeBody {
    title: String,
    phase: String,
    time: String,
    ingredients: String,
    steps: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("dukan_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/state")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server_with(data_path: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_dukan_tracker"))
        .env("PORT", port.to_string())
        .env("DUKAN_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn spawn_server() -> TestServer {
    spawn_server_with(&unique_data_path()).await
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn reset_state(client: &Client, base_url: &str) {
    let response = client
        .post(format!("{base_url}/api/reset"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn create_plan(
    client: &Client,
    base_url: &str,
    start: &str,
    target: &str,
    rhythm: &str,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/plan"))
        .json(&serde_json::json!({
            "start_weight": start,
            "target_weight": target,
            "rhythm": rhythm,
        }))
        .send()
        .await
        .unwrap()
}

async fn fetch_state(client: &Client, base_url: &str) -> StateBody {
    client
        .get(format!("{base_url}/api/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_create_plan_derives_phase_durations() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;

    let response = create_plan(&client, &server.base_url, "85", "70", "1/1").await;
    assert!(response.status().is_success());
    let plan: PlanBody = response.json().await.unwrap();

    assert_eq!(plan.start_weight, 85.0);
    assert_eq!(plan.target_weight, 70.0);
    assert_eq!(plan.attack_days, 5);
    assert_eq!(plan.cruise_days, 105);
    assert_eq!(plan.consolidation_days, 150);
    assert_eq!(plan.rhythm, "1/1");
    assert!(plan.start_date > 0);

    let state = fetch_state(&client, &server.base_url).await;
    assert!(state.plan.is_some());
    assert_eq!(state.logs, vec![LogEntry { date: plan.start_date, weight: 85.0 }]);
    assert!(state.water.is_empty());
}

#[tokio::test]
async fn http_create_plan_rejects_bad_input() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;

    let swapped = create_plan(&client, &server.base_url, "70", "85", "1/1").await;
    assert_eq!(swapped.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        swapped.text().await.unwrap(),
        "start weight must be above the target weight"
    );

    let empty = create_plan(&client, &server.base_url, "", "70", "1/1").await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let garbage = create_plan(&client, &server.base_url, "abc", "70", "1/1").await;
    assert_eq!(garbage.status(), StatusCode::BAD_REQUEST);

    let rhythm = create_plan(&client, &server.base_url, "85", "70", "3/3").await;
    assert_eq!(rhythm.status(), StatusCode::BAD_REQUEST);

    let state = fetch_state(&client, &server.base_url).await;
    assert!(state.plan.is_none());
    assert!(state.logs.is_empty());
}

#[tokio::test]
async fn http_record_weight_updates_summary() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;
    create_plan(&client, &server.base_url, "85", "70", "1/1").await;

    let response = client
        .post(format!("{}/api/weight", server.base_url))
        .json(&serde_json::json!({ "weight": "72.5" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let summary: SummaryBody = response.json().await.unwrap();

    assert_eq!(summary.current_weight, 72.5);
    assert_eq!(summary.weight_lost, "12.5");
    assert_eq!(summary.day, 1);
    assert_eq!(summary.phase, "Attack");
    assert_eq!(summary.water_today, 0);
    assert_eq!(summary.logs.len(), 2);
    assert_eq!(summary.logs[1].weight, 72.5);
    assert!(!summary.date.is_empty());
}

#[tokio::test]
async fn http_record_weight_rejects_garbage() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;
    create_plan(&client, &server.base_url, "85", "70", "1/1").await;

    for bad in ["abc", "", "12,5"] {
        let response = client
            .post(format!("{}/api/weight", server.base_url))
            .json(&serde_json::json!({ "weight": bad }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.text().await.unwrap(), "weight must be a number");
    }

    let state = fetch_state(&client, &server.base_url).await;
    assert_eq!(state.logs.len(), 1);
}

#[tokio::test]
async fn http_water_toggle_fills_and_undoes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;
    create_plan(&client, &server.base_url, "85", "70", "1/1").await;

    for (slot, expected) in [(2, 3), (2, 2), (4, 5), (4, 4), (0, 1)] {
        let response = client
            .post(format!("{}/api/water", server.base_url))
            .json(&serde_json::json!({ "slot": slot }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        let water: WaterBody = response.json().await.unwrap();
        assert_eq!(water.count, expected, "slot {slot}");
        assert!(!water.date.is_empty());
    }

    let summary: SummaryBody = client
        .get(format!("{}/api/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary.water_today, 1);
}

#[tokio::test]
async fn http_water_rejects_out_of_range_slot() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;
    create_plan(&client, &server.base_url, "85", "70", "1/1").await;

    for slot in [5, 9] {
        let response = client
            .post(format!("{}/api/water", server.base_url))
            .json(&serde_json::json!({ "slot": slot }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let state = fetch_state(&client, &server.base_url).await;
    assert!(state.water.is_empty());
}

#[tokio::test]
async fn http_plan_gated_routes_need_a_plan() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;

    let summary = client
        .get(format!("{}/api/summary", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(summary.status(), StatusCode::NOT_FOUND);

    let plan = client
        .get(format!("{}/api/plan", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(plan.status(), StatusCode::NOT_FOUND);

    let weight = client
        .post(format!("{}/api/weight", server.base_url))
        .json(&serde_json::json!({ "weight": "80" }))
        .send()
        .await
        .unwrap();
    assert_eq!(weight.status(), StatusCode::NOT_FOUND);

    let water = client
        .post(format!("{}/api/water", server.base_url))
        .json(&serde_json::json!({ "slot": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(water.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_reset_clears_everything() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;
    create_plan(&client, &server.base_url, "85", "70", "1/1").await;

    client
        .post(format!("{}/api/weight", server.base_url))
        .json(&serde_json::json!({ "weight": "83" }))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/api/water", server.base_url))
        .json(&serde_json::json!({ "slot": 0 }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/reset", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let state: StateBody = response.json().await.unwrap();
    assert!(state.plan.is_none());
    assert!(state.logs.is_empty());
    assert!(state.water.is_empty());

    let summary = client
        .get(format!("{}/api/summary", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(summary.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_foods_filter_by_name() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let all: Vec<FoodBody> = client
        .get(format!("{}/api/foods", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 12);
    assert!(all.iter().all(|food| food.phase == "A" || food.phase == "C"));

    let chicken: Vec<FoodBody> = client
        .get(format!("{}/api/foods?q=CHICKEN", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(chicken.len(), 1);
    assert_eq!(chicken[0].name, "Chicken breast");
    assert_eq!(chicken[0].category, "Meat");

    let ee: Vec<FoodBody> = client
        .get(format!("{}/api/foods?q=ee", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = ee.iter().map(|food| food.name.as_str()).collect();
    assert_eq!(names, vec!["Lean beef", "Cottage cheese 0%"]);

    let none: Vec<FoodBody> = client
        .get(format!("{}/api/foods?q=zzz", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn http_recipes_are_served() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let recipes: Vec<RecipeBody> = client
        .get(format!("{}/api/recipes", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].title, "Oat bran flatbread");
    assert_eq!(recipes[0].phase, "A");
    assert!(!recipes[0].time.is_empty());
    assert!(!recipes[0].ingredients.is_empty());
    assert!(!recipes[0].steps.is_empty());
}

#[tokio::test]
async fn http_index_reflects_plan_state() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("const HAS_PLAN = false;"));
    assert!(page.contains("Dukan Tracker"));

    create_plan(&client, &server.base_url, "85", "70", "1/1").await;

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("const HAS_PLAN = true;"));
    assert!(page.contains("85 kg"));
}

#[tokio::test]
async fn http_setup_form_fallback_creates_plan() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/plan", server.base_url))
        .form(&[
            ("start_weight", "85"),
            ("target_weight", "70"),
            ("rhythm", "2/2"),
        ])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.url().path(), "/");

    let plan: PlanBody = client
        .get(format!("{}/api/plan", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(plan.rhythm, "2/2");
}

#[tokio::test]
async fn http_setup_form_fallback_swallows_bad_input() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_state(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/plan", server.base_url))
        .form(&[
            ("start_weight", "70"),
            ("target_weight", "85"),
            ("rhythm", "1/1"),
        ])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let state = fetch_state(&client, &server.base_url).await;
    assert!(state.plan.is_none());
}

#[tokio::test]
async fn http_state_survives_restart() {
    let _guard = TEST_LOCK.lock().await;
    let data_path = unique_data_path();
    let client = Client::new();

    let before: serde_json::Value;
    {
        let server = spawn_server_with(&data_path).await;
        create_plan(&client, &server.base_url, "82", "74", "5/5").await;
        client
            .post(format!("{}/api/weight", server.base_url))
            .json(&serde_json::json!({ "weight": "81.2" }))
            .send()
            .await
            .unwrap();
        client
            .post(format!("{}/api/water", server.base_url))
            .json(&serde_json::json!({ "slot": 1 }))
            .send()
            .await
            .unwrap();

        before = client
            .get(format!("{}/api/state", server.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    }

    let server = spawn_server_with(&data_path).await;
    let after: serde_json::Value = client
        .get(format!("{}/api/state", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(before, after);
}
