use anyhow::anyhow;
use async_trait::async_trait;
use core_logic::{Notifier, SequentialRunner, SilentNotifier, TaskResult};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> bool {
        self.messages.lock().unwrap().push(message.to_string());
        true
    }
}

fn outcome(success: bool) -> anyhow::Result<TaskResult> {
    if success {
        Ok(TaskResult::success("ok", "0x01"))
    } else {
        Ok(TaskResult::failure("nope"))
    }
}

#[test]
fn test_should_pause_rules() {
    let runner = SequentialRunner::new(3, Duration::from_secs(5));

    assert!(runner.should_pause(true, 0));
    assert!(runner.should_pause(true, 1));
    assert!(!runner.should_pause(true, 2));
    assert!(!runner.should_pause(false, 0));
}

#[tokio::test(start_paused = true)]
async fn test_delay_only_after_successful_non_final_iteration() {
    let runner = SequentialRunner::new(4, Duration::from_secs(10));
    let script = [true, false, true, true];
    let mut stamps = Vec::new();
    let start = Instant::now();

    let reports = runner
        .run(&["w1".to_string()], &SilentNotifier, |_, i| {
            stamps.push(start.elapsed().as_secs());
            let result = outcome(script[i as usize]);
            async move { result }
        })
        .await;

    // #1 ok -> pause, #2 failed -> no pause, #3 ok -> pause, #4 last -> no pause
    assert_eq!(stamps, vec![0, 10, 10, 20]);
    assert_eq!(start.elapsed().as_secs(), 20);
    assert_eq!(reports[0].succeeded, 3);
    assert_eq!(reports[0].attempted, 4);
}

#[tokio::test(start_paused = true)]
async fn test_accounts_run_in_order_and_are_tallied_separately() {
    let runner = SequentialRunner::new(2, Duration::from_secs(5));
    let accounts = vec!["alpha".to_string(), "beta".to_string()];
    let mut visits = Vec::new();

    let reports = runner
        .run(&accounts, &SilentNotifier, |account, i| {
            visits.push(format!("{}#{}", account, i));
            let result = outcome(account == "alpha");
            async move { result }
        })
        .await;

    assert_eq!(visits, vec!["alpha#0", "alpha#1", "beta#0", "beta#1"]);
    assert_eq!(reports[0].account, "alpha");
    assert_eq!(reports[0].succeeded, 2);
    assert_eq!(reports[1].account, "beta");
    assert_eq!(reports[1].succeeded, 0);
}

#[tokio::test(start_paused = true)]
async fn test_error_counts_as_failure_and_is_notified() {
    let runner = SequentialRunner::new(2, Duration::from_secs(5));
    let notifier = RecordingNotifier::default();
    let start = Instant::now();

    let reports = runner
        .run(&["w1".to_string()], &notifier, |_, i| async move {
            if i == 0 {
                Err(anyhow!("rpc exploded"))
            } else {
                Ok(TaskResult::success("ok", "0x02"))
            }
        })
        .await;

    assert_eq!(reports[0].succeeded, 1);
    // failed first iteration is not followed by a pause
    assert_eq!(start.elapsed().as_secs(), 0);

    let messages = notifier.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Transaction #1 failed for wallet w1"));
    assert!(messages[0].contains("rpc exploded"));
}

#[tokio::test]
async fn test_no_accounts_produces_no_reports() {
    let runner = SequentialRunner::new(3, Duration::from_secs(5));
    let accounts: Vec<String> = Vec::new();

    let reports = runner
        .run(&accounts, &SilentNotifier, |_, _| async { outcome(true) })
        .await;

    assert!(reports.is_empty());
}
