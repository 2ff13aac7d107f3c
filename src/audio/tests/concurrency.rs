use crate::audio::buffer::SampleQueue;
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_producer_consumer() {
    let (mut queue, mut consumer_queue) = SampleQueue::new(64 * 1024).split();

    let iteration_count = 1000;
    let chunk_size = 960;

    // Producer thread writes whole frames
    let producer = thread::spawn(move || {
        for i in 0..iteration_count {
            #[allow(clippy::cast_possible_truncation)]
            let data = vec![(i % 255) as u8; chunk_size];
            while !queue.write_all(&data) {
                thread::sleep(Duration::from_micros(10));
            }
        }
    });

    // Consumer thread drains in device-sized periods
    let consumer = thread::spawn(move || {
        let mut total_read_bytes = 0;
        let expected_total = iteration_count * chunk_size;
        let mut period = vec![0u8; 512];

        while total_read_bytes < expected_total {
            let read = consumer_queue.read(&mut period);
            if read > 0 {
                for (j, byte) in period.iter().enumerate().take(read) {
                    let byte_index = total_read_bytes + j;
                    let chunk_index = byte_index / chunk_size;
                    #[allow(clippy::cast_possible_truncation)]
                    let expected_val = (chunk_index % 255) as u8;
                    assert_eq!(*byte, expected_val, "Mismatch at byte {byte_index}");
                }
                total_read_bytes += read;
            } else {
                thread::sleep(Duration::from_micros(10));
            }
        }
    });

    producer.join().unwrap();
    consumer.join().unwrap();
}
