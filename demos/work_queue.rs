use compacting_queue::{CompactingQueue, QueueConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    println!("Work Queue Example\n");

    const NUM_WORKERS: usize = 4;
    const NUM_JOBS: usize = 200;

    // Small threshold so compaction shows up with a modest job count.
    let config = QueueConfig::default().with_small_queue_threshold(8);
    let jobs = Arc::new(CompactingQueue::with_config(config));
    let results = Arc::new(CompactingQueue::new());
    let done = Arc::new(AtomicBool::new(false));

    let jobs_tx = jobs.clone();
    let done_tx = done.clone();
    let producer = thread::spawn(move || {
        for chunk in (0..NUM_JOBS).step_by(20) {
            let batch: Vec<String> = (chunk..chunk + 20).map(|i| format!("Job-{:03}", i)).collect();
            let n = jobs_tx.enqueue_batch(batch);
            println!("📝 Enqueued {} jobs (backlog {})", n, jobs_tx.len());
            thread::sleep(Duration::from_millis(20));
        }
        done_tx.store(true, Ordering::Release);
        println!("✅ All jobs enqueued!");
    });

    let mut workers = vec![];
    for worker_id in 0..NUM_WORKERS {
        let jobs_rx = jobs.clone();
        let results_tx = results.clone();
        let done_rx = done.clone();

        workers.push(thread::spawn(move || {
            let mut processed = 0;
            loop {
                match jobs_rx.dequeue() {
                    Some(job) => {
                        thread::sleep(Duration::from_millis(2));
                        results_tx.push(format!("{} -> worker {}", job, worker_id));
                        processed += 1;
                    }
                    None if done_rx.load(Ordering::Acquire) && jobs_rx.is_empty() => break,
                    None => thread::sleep(Duration::from_millis(1)),
                }
            }
            println!("Worker {} finished ({} jobs)", worker_id, processed);
        }));
    }

    producer.join().unwrap();
    for worker in workers {
        worker.join().unwrap();
    }

    let collected = results.dequeue_batch(usize::MAX);
    if let Some(last) = collected.last() {
        println!("✨ Last result: {}", last);
    }
    println!("✅ {} results collected", collected.len());

    let stats = jobs.stats();
    println!(
        "\nJob queue compacted {} times, reclaimed {} slots, moved {} jobs",
        stats.compactions, stats.slots_reclaimed, stats.elements_moved
    );
}
