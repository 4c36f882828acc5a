use atlas_core::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn second_of_three_fails_deterministically() {
    for limit in [1, 2, 10] {
        let items = process_batch(vec!["one", "two", "three"], limit, |s: &'static str| async move {
            if s == "two" {
                Err(AtlasError::Upstream("lookup failed".into()))
            } else {
                Ok(s.len())
            }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].input, "one");
        assert_eq!(items[0].outcome, Ok(3));
        assert_eq!(items[1].input, "two");
        assert!(items[1].error().unwrap().contains("lookup failed"));
        assert_eq!(items[2].outcome, Ok(5));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn fifty_sleepers_never_exceed_ten() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (a, p) = (active.clone(), peak.clone());

    let processor = BatchProcessor::new(10).unwrap();
    let items = processor
        .run((0..50).collect::<Vec<usize>>(), move |i| {
            let (active, peak) = (a.clone(), p.clone());
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                if i % 7 == 0 {
                    Err(format!("item {i} rejected"))
                } else {
                    Ok(i)
                }
            }
        })
        .await;

    assert_eq!(items.len(), 50);
    assert!(peak.load(Ordering::SeqCst) <= 10);
    assert_eq!(active.load(Ordering::SeqCst), 0);
    let report = BatchReport::from_items(&items);
    assert_eq!(report.failed, 8); // 0, 7, 14, ..., 49
    assert_eq!(report.succeeded, 42);
    for (i, item) in items.iter().enumerate() {
        assert_eq!(item.input, i);
    }
}

#[tokio::test(start_paused = true)]
async fn a_hung_item_only_holds_its_own_slot() {
    // limit 2: one item sleeps far longer than the rest, the others still
    // flow through the second slot
    let finished = Arc::new(AtomicUsize::new(0));
    let f = finished.clone();
    let handle = tokio::spawn(async move {
        process_batch((0..6).collect::<Vec<u32>>(), 2, move |i| {
            let finished = f.clone();
            async move {
                let ms = if i == 0 { 500 } else { 5 };
                tokio::time::sleep(Duration::from_millis(ms)).await;
                finished.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(i)
            }
        })
        .await
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 5);

    let items = handle.await.unwrap().unwrap();
    assert!(items.iter().all(BatchItem::is_ok));
}

#[tokio::test]
async fn dropping_the_batch_cancels_pending_items() {
    let started = Arc::new(AtomicUsize::new(0));
    let s = started.clone();
    let batch = process_batch((0..20).collect::<Vec<u32>>(), 1, move |i| {
        let started = s.clone();
        async move {
            started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, String>(i)
        }
    });

    let timed_out = tokio::time::timeout(Duration::from_millis(120), batch).await;
    assert!(timed_out.is_err());
    let seen = started.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(200)).await;
    // nothing new starts once the batch future is gone
    assert_eq!(started.load(Ordering::SeqCst), seen);
    assert!(seen < 20);
}
