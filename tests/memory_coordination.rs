//! Cross-thread coordination tests for the shared session memory.

use overdub::memory::{HistoryChannel, SessionMemory};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn caption_protocol_across_three_threads() {
    let memory = Arc::new(SessionMemory::new(2).unwrap());
    let captions = ["uno", "dos", "tres", "cuatro"];

    // Overlay thread: collect each distinct caption via wait_for_fresh,
    // then satisfy the display quota with counted reads.
    let overlay_memory = memory.clone();
    let overlay = thread::spawn(move || {
        let mut seen = Vec::new();
        let mut last_stamp = 0;
        for _ in 0..captions.len() {
            let (text, stamp) = overlay_memory.wait_for_fresh(last_stamp);
            last_stamp = stamp;
            seen.push(text);
            for _ in 0..2 {
                overlay_memory.read_overlay();
            }
        }
        seen
    });

    // Synth thread: consume each caption exactly once.
    let synth_memory = memory.clone();
    let synth = thread::spawn(move || {
        let mut spoken = Vec::new();
        while spoken.len() < captions.len() {
            match synth_memory.read_synth() {
                Some(text) => spoken.push(text),
                None => thread::sleep(Duration::from_millis(1)),
            }
        }
        spoken
    });

    // Writer: publish the captions in order. Each write blocks until the
    // previous caption was displayed twice and spoken once.
    for caption in captions {
        memory.write(caption);
    }

    let seen = overlay.join().unwrap();
    let spoken = synth.join().unwrap();

    assert_eq!(seen, captions);
    assert_eq!(spoken, captions);
}

#[test]
fn audio_relay_queues_preserve_order_under_concurrency() {
    let memory = Arc::new(SessionMemory::new(1).unwrap());

    let producer_memory = memory.clone();
    let producer = thread::spawn(move || {
        for chunk in 0..100u32 {
            let base = chunk as f32;
            producer_memory.append_ingress(&[base, base + 0.5]);
        }
    });

    let consumer_memory = memory.clone();
    let consumer = thread::spawn(move || {
        let mut collected = Vec::new();
        while collected.len() < 200 {
            let drained = consumer_memory.drain_ingress();
            if drained.is_empty() {
                thread::sleep(Duration::from_millis(1));
            } else {
                collected.extend(drained);
            }
        }
        collected
    });

    producer.join().unwrap();
    let collected = consumer.join().unwrap();

    assert_eq!(collected.len(), 200);
    // Per-chunk ordering survives interleaved drains.
    for chunk in 0..100 {
        let base = chunk as f32;
        assert_eq!(collected[chunk * 2], base);
        assert_eq!(collected[chunk * 2 + 1], base + 0.5);
    }
}

#[test]
fn history_accumulates_while_mailbox_cycles() {
    let memory = Arc::new(SessionMemory::new(1).unwrap());

    for i in 0..5 {
        let original = format!("original {}", i);
        let translated = format!("translated {}", i);
        memory.append_history(original.as_str(), HistoryChannel::Original);
        memory.append_history(translated.as_str(), HistoryChannel::Translated);
        memory.write(translated);

        memory.read_overlay();
        assert!(memory.read_synth().is_some());
    }

    let transcript = memory.transcript();
    assert_eq!(transcript.original.len(), 5);
    assert_eq!(transcript.translated.len(), 5);
    assert_eq!(transcript.original[0], "original 0");
    assert_eq!(transcript.translated[4], "translated 4");
}

#[test]
fn transcript_snapshot_is_independent_of_later_writes() {
    let memory = Arc::new(SessionMemory::new(1).unwrap());

    memory.append_history("before", HistoryChannel::Original);
    let snapshot = memory.transcript();
    memory.append_history("after", HistoryChannel::Original);

    assert_eq!(snapshot.original, vec!["before"]);
    assert_eq!(memory.transcript().original, vec!["before", "after"]);
}
