use super::*;
use std::sync::{Arc, Mutex};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[test]
fn receiver_sees_every_value_once_in_order() {
    let rv = Arc::new(Rendezvous::new());
    let sender = {
        let rv = Arc::clone(&rv);
        thread::spawn(move || {
            for i in 0..500u32 {
                rv.send(i).expect("send");
            }
        })
    };

    for expected in 0..500u32 {
        assert_eq!(rv.recv().expect("recv"), expected);
    }
    sender.join().expect("sender thread panicked");
}

#[test]
fn sides_strictly_alternate() {
    // Each side logs its turn; the log must read A, B, A, B, ...
    let rv = Arc::new(Rendezvous::new());
    let log = Arc::new(Mutex::new(Vec::new()));

    let a = {
        let rv = Arc::clone(&rv);
        let log = Arc::clone(&log);
        thread::spawn(move || {
            for i in 0..200u32 {
                log.lock().expect("log mutex poisoned").push(('A', i));
                rv.send(i).expect("send");
            }
        })
    };

    let mut last_seen = None;
    for _ in 0..200 {
        let v = rv.recv().expect("recv");
        // B never observes the same state of A twice.
        assert_ne!(last_seen, Some(v));
        last_seen = Some(v);
        log.lock().expect("log mutex poisoned").push(('B', v));
    }
    a.join().expect("sender thread panicked");

    let log = log.lock().expect("log mutex poisoned");
    let a_turns: Vec<u32> = log.iter().filter(|e| e.0 == 'A').map(|e| e.1).collect();
    let b_turns: Vec<u32> = log.iter().filter(|e| e.0 == 'B').map(|e| e.1).collect();
    assert_eq!(a_turns, b_turns);
    // A can be at most one value ahead of B at any point of the log.
    let mut ahead = 0i32;
    for (side, _) in log.iter() {
        ahead += if *side == 'A' { 1 } else { -1 };
        assert!((0..=2).contains(&ahead), "sender ran ahead: {ahead}");
    }
}

#[test]
fn sender_blocks_until_value_taken() {
    let rv = Arc::new(Rendezvous::new());
    let (done_tx, done_rx) = mpsc::channel();
    let handle = {
        let rv = Arc::clone(&rv);
        thread::spawn(move || {
            rv.send(7u8).expect("send");
            done_tx.send(()).expect("done");
        })
    };

    // Nobody has received yet, so the sender must still be parked.
    assert!(done_rx.recv_timeout(Duration::from_millis(100)).is_err());
    assert_eq!(rv.recv().expect("recv"), 7);
    done_rx
        .recv_timeout(Duration::from_secs(1))
        .expect("sender should be released");
    handle.join().expect("sender thread panicked");
}

#[test]
fn close_unblocks_waiting_receiver() {
    let rv: Arc<Rendezvous<u8>> = Arc::new(Rendezvous::new());
    let (ready_tx, ready_rx) = mpsc::channel();
    let (done_tx, done_rx) = mpsc::channel();
    let handle = {
        let rv = Arc::clone(&rv);
        thread::spawn(move || {
            ready_tx.send(()).expect("ready");
            done_tx.send(rv.recv()).expect("done");
        })
    };

    ready_rx.recv_timeout(Duration::from_secs(1)).expect("ready");
    rv.close();
    let result = done_rx.recv_timeout(Duration::from_secs(1)).expect("done");
    assert!(result.unwrap_err().is_closed());
    handle.join().expect("receiver thread panicked");
    assert!(rv.is_closed());
}

#[test]
fn close_unblocks_waiting_sender_and_rejects_new_sends() {
    let rv = Arc::new(Rendezvous::new());
    let handle = {
        let rv = Arc::clone(&rv);
        thread::spawn(move || rv.send(1u8))
    };
    thread::sleep(Duration::from_millis(50));
    rv.close();
    assert!(handle.join().expect("sender thread panicked").is_err());
    assert!(rv.send(2).unwrap_err().is_closed());
}
