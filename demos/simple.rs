//! Simple usage example

use compacting_queue::CompactingQueue;
use std::sync::Arc;
use std::thread;

fn main() {
    println!("Compacting Queue - Simple Example\n");

    let queue = Arc::new(CompactingQueue::<String>::new());

    let producer_queue = queue.clone();
    let consumer_queue = queue.clone();

    let producer = thread::spawn(move || {
        for i in 0..10 {
            let message = producer_queue.enqueue(format!("Message {}", i));
            println!("Sending: {}", message);

            // Small delay to make output readable
            thread::sleep(std::time::Duration::from_millis(100));
        }
        println!("Producer finished!");
    });

    let consumer = thread::spawn(move || {
        for _ in 0..10 {
            loop {
                match consumer_queue.dequeue() {
                    Some(message) => {
                        println!("Received: {}", message);
                        break;
                    }
                    // Non-blocking: an empty queue answers None, so retry.
                    None => thread::yield_now(),
                }
            }
        }
        println!("Consumer finished!");
    });

    producer.join().unwrap();
    consumer.join().unwrap();

    println!("\nStorage: {} slots, {:?}", queue.slots(), queue.stats());
    println!("Example completed successfully!");
}
