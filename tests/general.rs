use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chanlet::{
    channel, select, select_timeout, Candidate, CloseError, DestroyError, Outcome, RecvError,
    RecvTimeoutError, SelectError, SendError, SendTimeoutError, TryRecvError, TrySendError,
};

#[test]
fn buffered_transfer() {
    let ch = channel(2);
    assert_eq!(ch.send(10), Ok(()));
    assert_eq!(ch.send(20), Ok(()));
    assert_eq!(ch.receive(), Ok(10));
    assert_eq!(ch.receive(), Ok(20));
}

#[test]
fn backpressure() {
    let ch = channel(1);
    assert_eq!(ch.send('A'), Ok(()));

    let producer = {
        let ch = ch.clone();
        thread::spawn(move || ch.send('B'))
    };

    // Give the producer a chance to block on the full channel.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(ch.receive(), Ok('A'));
    assert_eq!(producer.join().unwrap(), Ok(()));
    assert_eq!(ch.receive(), Ok('B'));
}

#[test]
fn close_unblocks_senders() {
    let ch = channel(1);
    assert_eq!(ch.send(0), Ok(()));

    let p1 = {
        let ch = ch.clone();
        thread::spawn(move || ch.send(1))
    };
    let p2 = {
        let ch = ch.clone();
        thread::spawn(move || ch.send(2))
    };

    thread::sleep(Duration::from_millis(50));
    assert_eq!(ch.close(), Ok(()));

    assert_eq!(p1.join().unwrap(), Err(SendError(1)));
    assert_eq!(p2.join().unwrap(), Err(SendError(2)));
}

#[test]
fn non_blocking_on_empty() {
    let ch: chanlet::Channel<i32> = channel(4);
    assert_eq!(ch.try_receive(), Err(TryRecvError::Empty));
    // Leaves no partial state: a subsequent send/receive still round-trips.
    assert_eq!(ch.send(1), Ok(()));
    assert_eq!(ch.receive(), Ok(1));
}

#[test]
fn select_picks_first_ready() {
    let a: chanlet::Channel<i32> = channel(1);
    let b: chanlet::Channel<i32> = channel(1);
    assert_eq!(b.send(7), Ok(()));

    let outcome = select(vec![Candidate::receive(&a), Candidate::receive(&b)]).unwrap();
    match outcome {
        Outcome::Received { index, value } => {
            assert_eq!(index, 1);
            assert_eq!(value, 7);
        }
        Outcome::Sent { .. } => panic!("expected a receive outcome"),
    }
}

#[test]
fn select_blocks_then_wakes() {
    let a: chanlet::Channel<i32> = channel(1);
    let b: chanlet::Channel<i32> = channel(1);

    let sender = {
        let b = b.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            b.send(42).unwrap();
        })
    };

    let outcome = select(vec![Candidate::receive(&a), Candidate::receive(&b)]).unwrap();
    match outcome {
        Outcome::Received { index, value } => {
            assert_eq!(index, 1);
            assert_eq!(value, 42);
        }
        Outcome::Sent { .. } => panic!("expected a receive outcome"),
    }
    sender.join().unwrap();
}

#[test]
fn select_propagates_close() {
    let a: chanlet::Channel<i32> = channel(1);
    let b: chanlet::Channel<i32> = channel(1);
    assert_eq!(b.close(), Ok(()));

    let err = select(vec![Candidate::receive(&a), Candidate::receive(&b)]).unwrap_err();
    assert_eq!(err, SelectError { index: 1 });
}

#[test]
fn multiple_consumers_share_one_buffer_fairly() {
    const COUNT: i32 = 500;

    let ch = channel(4);
    let seen = Arc::new(Mutex::new(HashSet::new()));

    let producer = {
        let ch = ch.clone();
        thread::spawn(move || {
            for i in 0..COUNT {
                ch.send(i).unwrap();
            }
            ch.close().unwrap();
        })
    };

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let ch = ch.clone();
            let seen = seen.clone();
            thread::spawn(move || {
                while let Ok(value) = ch.receive() {
                    seen.lock().unwrap().insert(value);
                }
            })
        })
        .collect();

    producer.join().unwrap();
    for consumer in consumers {
        consumer.join().unwrap();
    }

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), COUNT as usize);
    for i in 0..COUNT {
        assert!(seen.contains(&i), "value {i} was dropped or never delivered");
    }
}

#[test]
fn select_fairness_under_repeated_readiness() {
    // `always_ready` is refilled by a background thread as fast as it is
    // drained, so it is (almost) always the first ready candidate. `rare`
    // only becomes ready occasionally. Over many iterations, `select` must
    // still pick `rare` when it wins the race rather than starving it
    // indefinitely in favor of the earlier, perpetually-ready candidate.
    let always_ready: chanlet::Channel<i32> = channel(1);
    let rare: chanlet::Channel<i32> = channel(1);

    let always_ready_feeder = {
        let ch = always_ready.clone();
        thread::spawn(move || {
            for _ in 0..2000 {
                let _ = ch.send(0);
            }
        })
    };

    let rare_feeder = {
        let ch = rare.clone();
        thread::spawn(move || {
            for i in 0..20 {
                thread::sleep(Duration::from_millis(5));
                let _ = ch.send(i);
            }
        })
    };

    let mut rare_hits = 0;
    for _ in 0..2000 {
        match select(vec![
            Candidate::receive(&always_ready),
            Candidate::receive(&rare),
        ]) {
            Ok(Outcome::Received { index: 1, .. }) => rare_hits += 1,
            Ok(_) => {}
            Err(_) => break,
        }
    }

    always_ready_feeder.join().unwrap();
    rare_feeder.join().unwrap();
    assert!(rare_hits > 0, "the rarely-ready candidate was starved");
}

#[test]
fn close_while_many_selects_are_parked_across_several_channels() {
    let target: chanlet::Channel<i32> = channel(1);
    let sibling_a: chanlet::Channel<i32> = channel(1);
    let sibling_b: chanlet::Channel<i32> = channel(1);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let target = target.clone();
            let sibling_a = sibling_a.clone();
            let sibling_b = sibling_b.clone();
            thread::spawn(move || {
                select(vec![
                    Candidate::receive(&sibling_a),
                    Candidate::receive(&sibling_b),
                    Candidate::receive(&target),
                ])
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    assert_eq!(target.close(), Ok(()));

    for handle in handles {
        let outcome = handle.join().unwrap();
        assert_eq!(outcome, Err(SelectError { index: 2 }));
    }
}

#[test]
fn timed_variants_time_out_without_corrupting_state() {
    let ch = channel(1);
    assert_eq!(ch.send(1), Ok(()));

    assert_eq!(
        ch.send_timeout(2, Duration::from_millis(20)),
        Err(SendTimeoutError::Timeout(2))
    );

    let empty: chanlet::Channel<i32> = channel(1);
    assert_eq!(
        empty.receive_timeout(Duration::from_millis(20)),
        Err(RecvTimeoutError::Timeout)
    );
    assert_eq!(
        select_timeout(vec![Candidate::receive(&empty)], Duration::from_millis(20)),
        Err(chanlet::SelectTimeoutError::Timeout)
    );

    // Slots/items bookkeeping is untouched by a timed-out attempt: the
    // channel is still exactly as usable as before.
    assert_eq!(ch.receive(), Ok(1));
    assert_eq!(ch.send(3), Ok(()));
    assert_eq!(ch.receive(), Ok(3));
    assert_eq!(empty.send(9), Ok(()));
    assert_eq!(empty.receive(), Ok(9));
}

#[test]
fn close_is_idempotent() {
    let ch: chanlet::Channel<()> = channel(1);
    assert_eq!(ch.close(), Ok(()));
    assert_eq!(ch.close(), Err(CloseError));
}

#[test]
fn destroy_requires_a_closed_channel() {
    let ch: chanlet::Channel<()> = channel(1);
    assert_eq!(ch.destroy(), Err(DestroyError));
    assert_eq!(ch.close(), Ok(()));
    assert_eq!(ch.destroy(), Ok(()));
}

#[test]
fn try_send_reports_closed_even_when_also_full() {
    let ch = channel(1);
    assert_eq!(ch.try_send(1), Ok(()));
    assert_eq!(ch.try_send(2), Err(TrySendError::Full(2)));

    assert_eq!(ch.close(), Ok(()));
    assert_eq!(ch.try_send(3), Err(TrySendError::Closed(3)));
}

#[test]
fn receive_drains_buffer_before_reporting_closed() {
    let ch = channel(2);
    assert_eq!(ch.send(1), Ok(()));
    assert_eq!(ch.send(2), Ok(()));
    assert_eq!(ch.close(), Ok(()));

    assert_eq!(ch.receive(), Ok(1));
    assert_eq!(ch.receive(), Ok(2));
    assert_eq!(ch.receive(), Err(RecvError));
}
