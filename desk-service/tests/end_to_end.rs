//! End-to-end scenarios over the full dispatcher

use chrono::{Duration, NaiveTime};
use desk_service::{ChannelSink, Command, Config, Dispatcher, Reply};
use room_control::OperatorId;
use shift_ledger::{week, CsvSheetStore, LedgerRow, OperatorKey, SheetStore};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

fn test_config(temp: &TempDir) -> Config {
    Config {
        registry_data_dir: temp.path().join("rooms"),
        sheet_dir: temp.path().join("sheets"),
        ..Default::default()
    }
}

fn entries(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_full_shift_scenario() {
    let temp = TempDir::new().unwrap();
    let (sink, mut events) = ChannelSink::new();
    let dispatcher = Dispatcher::open(&test_config(&temp), Arc::new(sink)).unwrap();

    let x = OperatorId::new("operator-x");
    let y = OperatorId::new("operator-y");

    // X claims Room 2
    let reply = dispatcher
        .handle(Command::Claim {
            room: "Room 2".to_string(),
            operator: x.clone(),
        })
        .await;
    assert_eq!(
        reply,
        Reply::Assigned {
            room: "Room 2".to_string(),
            reaffirmed: false,
        }
    );

    // Y is denied while X holds the room, and nothing changes
    let reply = dispatcher
        .handle(Command::Claim {
            room: "Room 2".to_string(),
            operator: y.clone(),
        })
        .await;
    assert_eq!(
        reply,
        Reply::Denied {
            room: "Room 2".to_string(),
            held_by: x.clone(),
        }
    );
    assert_eq!(
        dispatcher.registry().occupant("Room 2").unwrap(),
        Some(x.clone())
    );

    // X starts the turn; Y cannot
    let reply = dispatcher
        .handle(Command::Start {
            room: "Room 2".to_string(),
            operator: x.clone(),
        })
        .await;
    assert_eq!(
        reply,
        Reply::TurnStarted {
            room: "Room 2".to_string(),
        }
    );
    let reply = dispatcher
        .handle(Command::Start {
            room: "Room 2".to_string(),
            operator: y.clone(),
        })
        .await;
    assert_eq!(
        reply,
        Reply::NotOwner {
            room: "Room 2".to_string(),
        }
    );

    // Y can still report a problem on a room it does not hold
    let reply = dispatcher
        .handle(Command::Report {
            room: "Room 2".to_string(),
            operator: y.clone(),
            text: "lamp is broken".to_string(),
        })
        .await;
    assert_eq!(
        reply,
        Reply::Reported {
            room: "Room 2".to_string(),
        }
    );

    // X submits results on a clean ledger: 12 + 7 ("7x") + 0 (missing) + 0
    let reply = dispatcher
        .handle(Command::Submit {
            operator: x.clone(),
            entries: entries(&[("Streams", "12"), ("Messages", "7x"), ("Calls", "0")]),
        })
        .await;
    assert_eq!(
        reply,
        Reply::Submitted {
            daily_total: 19,
            weekly_accumulated: 19,
        }
    );

    // Second submission the same day keeps accumulating
    let reply = dispatcher
        .handle(Command::Submit {
            operator: x.clone(),
            entries: entries(&[("Tips", "5")]),
        })
        .await;
    assert_eq!(
        reply,
        Reply::Submitted {
            daily_total: 5,
            weekly_accumulated: 24,
        }
    );

    // X ends the turn and the room frees up
    let reply = dispatcher
        .handle(Command::End {
            room: "Room 2".to_string(),
            operator: x.clone(),
        })
        .await;
    assert_eq!(
        reply,
        Reply::TurnEnded {
            room: "Room 2".to_string(),
        }
    );
    assert_eq!(dispatcher.registry().occupant("Room 2").unwrap(), None);

    // Y can claim the freed room
    let reply = dispatcher
        .handle(Command::Claim {
            room: "Room 2".to_string(),
            operator: y,
        })
        .await;
    assert!(matches!(reply, Reply::Assigned { .. }));

    // Events arrived in commit order
    let kinds: Vec<&'static str> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|envelope| envelope.event.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "room_claimed",
            "room_denied",
            "turn_started",
            "problem_reported",
            "result_submitted",
            "result_submitted",
            "turn_ended",
            "room_claimed",
        ]
    );

    dispatcher.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_weekly_reset_on_first_post_boundary_submission() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);

    // Seed last week's rows directly through the sheet port
    let sheet = CsvSheetStore::new(&config.sheet_dir, config.categories.clone()).unwrap();
    let key = OperatorKey::new("operator-x");
    let offset = config.ledger_config().offset().unwrap();
    let stale_date = week::now_in(offset).date_naive() - Duration::days(21);
    sheet
        .append_row(
            &key,
            &LedgerRow {
                date: stale_date,
                values: vec![40, 0, 0, 0],
                daily_total: 40,
                weekly_accumulated: 40,
                time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            },
        )
        .unwrap();

    let (sink, _events) = ChannelSink::new();
    let dispatcher = Dispatcher::open(&config, Arc::new(sink)).unwrap();
    let x = OperatorId::new("operator-x");

    // First post-boundary submission counts only its own total
    let reply = dispatcher
        .handle(Command::Submit {
            operator: x.clone(),
            entries: entries(&[("Streams", "19")]),
        })
        .await;
    assert_eq!(
        reply,
        Reply::Submitted {
            daily_total: 19,
            weekly_accumulated: 19,
        }
    );

    // The clear fired exactly once
    let reply = dispatcher
        .handle(Command::Submit {
            operator: x,
            entries: entries(&[("Streams", "5")]),
        })
        .await;
    assert_eq!(
        reply,
        Reply::Submitted {
            daily_total: 5,
            weekly_accumulated: 24,
        }
    );

    let rows = sheet.load_rows(&key).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.date > stale_date));

    dispatcher.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_occupancy_survives_restart() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);
    let x = OperatorId::new("operator-x");

    {
        let (sink, _events) = ChannelSink::new();
        let dispatcher = Dispatcher::open(&config, Arc::new(sink)).unwrap();
        dispatcher
            .handle(Command::Claim {
                room: "Room 4".to_string(),
                operator: x.clone(),
            })
            .await;
        dispatcher.shutdown().await.unwrap();
    }

    let (sink, _events) = ChannelSink::new();
    let dispatcher = Dispatcher::open(&config, Arc::new(sink)).unwrap();

    assert_eq!(
        dispatcher.registry().occupant("Room 4").unwrap(),
        Some(x.clone())
    );
    assert_eq!(
        dispatcher.registry().find_assignment(&x),
        Some("Room 4".to_string())
    );

    dispatcher.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_submissions_are_serialized_per_operator() {
    let temp = TempDir::new().unwrap();
    let (sink, _events) = ChannelSink::new();
    let dispatcher = Arc::new(Dispatcher::open(&test_config(&temp), Arc::new(sink)).unwrap());
    let x = OperatorId::new("operator-x");

    let mut handles = Vec::new();
    for _ in 0..12 {
        let dispatcher = dispatcher.clone();
        let x = x.clone();
        handles.push(tokio::spawn(async move {
            dispatcher
                .handle(Command::Submit {
                    operator: x,
                    entries: entries(&[("Streams", "3")]),
                })
                .await
        }));
    }

    let mut totals = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Reply::Submitted {
                weekly_accumulated, ..
            } => totals.push(weekly_accumulated),
            other => panic!("unexpected reply: {:?}", other),
        }
    }
    totals.sort_unstable();

    // No two submissions derived from the same prior base
    let expected: Vec<u64> = (1..=12).map(|n| n * 3).collect();
    assert_eq!(totals, expected);

    dispatcher.shutdown().await.unwrap();
}
