#![cfg(not(loom))]

use compacting_queue::{CompactingQueue, QueueConfig, SlotBuffer};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Enqueue(u16),
    Dequeue,
    DequeueBatch(usize),
    Compact,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u16>().prop_map(Op::Enqueue),
        3 => Just(Op::Dequeue),
        1 => (0usize..8).prop_map(Op::DequeueBatch),
        1 => Just(Op::Compact),
    ]
}

fn config() -> impl Strategy<Value = QueueConfig> {
    (0usize..40, 0.05f64..0.95).prop_map(|(small, fraction)| {
        QueueConfig::new(small, fraction).expect("fraction in range")
    })
}

proptest! {
    #[test]
    fn matches_vecdeque_model(cfg in config(), ops in prop::collection::vec(op(), 0..400)) {
        let queue = CompactingQueue::with_config(cfg);
        let mut model = VecDeque::new();
        let mut enqueued = 0usize;
        let mut dequeued = 0usize;

        for op in ops {
            match op {
                Op::Enqueue(v) => {
                    prop_assert_eq!(queue.enqueue(v), v);
                    model.push_back(v);
                    enqueued += 1;
                }
                Op::Dequeue => {
                    let got = queue.dequeue();
                    prop_assert_eq!(got, model.pop_front());
                    dequeued += usize::from(got.is_some());
                }
                Op::DequeueBatch(n) => {
                    let got = queue.dequeue_batch(n);
                    let want: Vec<_> = (0..n).map_while(|_| model.pop_front()).collect();
                    dequeued += got.len();
                    prop_assert_eq!(got, want);
                }
                Op::Compact => {
                    queue.compact();
                }
            }
            prop_assert_eq!(queue.len(), enqueued - dequeued);
            prop_assert_eq!(queue.front(), model.front().copied());
            prop_assert_eq!(queue.tail(), model.back().copied());
        }
    }

    #[test]
    fn compaction_is_transparent(ops in prop::collection::vec(op(), 0..400)) {
        // One queue compacts as eagerly as allowed, the other never does.
        let eager = CompactingQueue::with_config(QueueConfig::new(0, 0.01).unwrap());
        let lazy = CompactingQueue::with_config(QueueConfig::new(usize::MAX, 0.99).unwrap());

        for op in ops {
            match op {
                Op::Enqueue(v) => {
                    eager.enqueue(v);
                    lazy.enqueue(v);
                }
                Op::Dequeue => prop_assert_eq!(eager.dequeue(), lazy.dequeue()),
                Op::DequeueBatch(n) => prop_assert_eq!(eager.dequeue_batch(n), lazy.dequeue_batch(n)),
                Op::Compact => {}
            }
            prop_assert_eq!(eager.front(), lazy.front());
            prop_assert_eq!(eager.tail(), lazy.tail());
            prop_assert_eq!(&eager, &lazy);
        }
        prop_assert_eq!(lazy.stats().compactions, 0);
    }

    #[test]
    fn compaction_work_is_amortized(cfg in config(), ops in prop::collection::vec(op(), 0..2000)) {
        let mut buf = SlotBuffer::with_config(cfg);
        let mut n = 0u64;
        for op in ops {
            n += 1;
            match op {
                Op::Enqueue(v) => buf.push(v),
                Op::Dequeue | Op::DequeueBatch(_) | Op::Compact => {
                    buf.pop_front();
                }
            }
        }
        // Every compaction moves fewer than (1 - f) / f slots per reclaimed
        // slot, and each reclaimed slot was one dequeue.
        let fraction = cfg.empty_fraction_threshold();
        let stats = buf.stats();
        let bound = ((1.0 - fraction) / fraction).ceil() as u64 + 1;
        prop_assert!(stats.elements_moved <= bound * n, "{:?} over {} ops", stats, n);
        prop_assert!(stats.slots_reclaimed <= n);
    }
}
