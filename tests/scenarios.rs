//! End-to-end scenarios against the public API, with host fakes for the UART
//! and LEDs.

use core::cell::{Cell, RefCell};
use embassy_time::{Duration, Instant};
use nucleo_weather::config::{LoggerConfig, TaskConfig};
use nucleo_weather::core::error::{CoreError, Result};
use nucleo_weather::core::fault::FaultIndicator;
use nucleo_weather::core::log_pipeline::{Delivery, LogPipeline};
use nucleo_weather::core::pool::MessagePool;
use nucleo_weather::core::rendezvous::{ChannelState, RendezvousChannel, RendezvousTransmitter};
use nucleo_weather::core::task::{TaskId, TaskRegistry};
use nucleo_weather::core::timeout::WaitLimit;
use nucleo_weather::core::traits::MockTime;
use nucleo_weather::core::ResourceLock;
use nucleo_weather::platform::error::{PlatformError, UartError};
use nucleo_weather::platform::traits::{TransmitCompleteHandler, UartTransmitter};

type Log = LogPipeline<MockTime, 16, 128, 20>;

/// UART that completes every frame at once, or never
struct FakeUart<'a> {
    isr: &'a RendezvousChannel,
    frames: RefCell<Vec<Vec<u8>>>,
    complete: bool,
    busy: Cell<bool>,
}

impl<'a> FakeUart<'a> {
    fn new(isr: &'a RendezvousChannel) -> Self {
        Self {
            isr,
            frames: RefCell::new(Vec::new()),
            complete: true,
            busy: Cell::new(false),
        }
    }

    fn silent(isr: &'a RendezvousChannel) -> Self {
        Self {
            complete: false,
            ..Self::new(isr)
        }
    }

    fn text(&self) -> Vec<String> {
        self.frames
            .borrow()
            .iter()
            .map(|f| String::from_utf8(f.clone()).unwrap())
            .collect()
    }
}

impl UartTransmitter for FakeUart<'_> {
    fn begin_transmit(&mut self, data: &[u8]) -> nucleo_weather::platform::Result<()> {
        if self.busy.get() {
            return Err(PlatformError::Uart(UartError::Busy));
        }
        self.frames.borrow_mut().push(data.to_vec());
        if self.complete {
            self.isr.on_transmit_complete();
        } else {
            self.busy.set(true);
        }
        Ok(())
    }
}

#[derive(Default)]
struct Lamp {
    soft: Cell<u32>,
}

impl FaultIndicator for Lamp {
    async fn show_fault(&self) -> Result<()> {
        Ok(())
    }

    async fn show_soft_error(&self) -> Result<()> {
        self.soft.set(self.soft.get() + 1);
        Ok(())
    }
}

fn tasks(registry: &TaskRegistry<8>, names: &[&'static str]) -> Vec<TaskId> {
    names
        .iter()
        .map(|name| {
            registry
                .register(TaskConfig::new(*name, 0, Duration::from_millis(1)))
                .unwrap()
        })
        .collect()
}

async fn consume(
    log: &Log,
    tx: &mut RendezvousTransmitter<'_, FakeUart<'_>>,
    lamp: &Lamp,
    count: usize,
) -> Vec<Delivery> {
    let mut out = Vec::new();
    for _ in 0..count {
        out.push(log.service_next(tx, lamp).await.unwrap());
    }
    out
}

#[tokio::test]
async fn three_producers_one_consumer() {
    let registry = TaskRegistry::new();
    let ids = tasks(&registry, &["A", "B", "C"]);
    let log = Log::new(MockTime::new(), LoggerConfig::default());
    let channel = RendezvousChannel::new();
    let mut tx = RendezvousTransmitter::new(FakeUart::new(&channel), &channel);
    let lamp = Lamp::default();

    let (a, b, c, delivered) = tokio::join!(
        log.log(&ids[0], "A"),
        log.log(&ids[1], "B"),
        log.log(&ids[2], "C"),
        consume(&log, &mut tx, &lamp, 3),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    assert_eq!(delivered.len(), 3);
    let mut frames = tx.hardware().text();
    frames.sort();
    assert_eq!(frames, ["[0][A] A\n", "[0][B] B\n", "[0][C] C\n"]);
    assert_eq!(log.pool().free_count(), 16);
    assert_eq!(lamp.soft.get(), 0);
}

async fn produce(log: &Log, id: TaskId, count: u32) {
    for i in 0..count {
        log.log_with_integer(&id, "msg", i).await.unwrap();
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn interleaved_producers_keep_fifo() {
    let registry = TaskRegistry::new();
    let ids = tasks(&registry, &["P0", "P1", "P2", "P3"]);
    let log = Log::new(MockTime::new(), LoggerConfig::default());
    let channel = RendezvousChannel::new();
    let mut tx = RendezvousTransmitter::new(FakeUart::new(&channel), &channel);
    let lamp = Lamp::default();

    let ((), (), (), (), delivered) = tokio::join!(
        produce(&log, ids[0], 25),
        produce(&log, ids[1], 25),
        produce(&log, ids[2], 25),
        produce(&log, ids[3], 25),
        consume(&log, &mut tx, &lamp, 100),
    );

    // The consumer sees enqueue order exactly: no gaps, no repeats
    let sequences: Vec<u32> = delivered
        .iter()
        .map(|d| match d {
            Delivery::Sent { sequence, .. } => *sequence,
            Delivery::TransmitFailed { sequence } => panic!("line {} dropped", sequence),
        })
        .collect();
    assert_eq!(sequences, (0..100).collect::<Vec<u32>>());

    // Each producer's own lines arrive in program order
    let frames = tx.hardware().text();
    for id in &ids {
        let prefix = format!("[0][{}] msg ", id.name());
        let mine: Vec<u32> = frames
            .iter()
            .filter_map(|f| f.strip_prefix(&prefix))
            .map(|rest| rest.trim_end().parse().unwrap())
            .collect();
        assert_eq!(mine, (0..25).collect::<Vec<u32>>());
    }
    assert_eq!(log.pool().free_count(), 16);
}

#[tokio::test]
async fn round_trip_is_byte_exact() {
    let registry = TaskRegistry::new();
    let ids = tasks(&registry, &["Sensor Task"]);
    let log = Log::new(MockTime::with_initial(98_765_000), LoggerConfig::default());
    let channel = RendezvousChannel::new();
    let mut tx = RendezvousTransmitter::new(FakeUart::new(&channel), &channel);
    let lamp = Lamp::default();

    let message = "Pressure: 1013.250000 ~ äöü";
    log.log(&ids[0], message).await.unwrap();
    let delivery = log.service_next(&mut tx, &lamp).await.unwrap();

    let expected = format!("[98765][Sensor Task] {}\n", message);
    assert_eq!(
        delivery,
        Delivery::Sent {
            sequence: 0,
            len: expected.len()
        }
    );
    assert_eq!(tx.hardware().frames.borrow()[0], expected.as_bytes());
}

#[test]
fn seventeenth_acquire_is_exhausted() {
    let pool = MessagePool::<16, 128>::new();
    let mut held: Vec<_> = (0..16).map(|_| pool.acquire().unwrap()).collect();

    let start = std::time::Instant::now();
    assert_eq!(pool.acquire(), Err(CoreError::ResourceExhausted));
    assert!(start.elapsed() < std::time::Duration::from_millis(50));

    pool.release(held.pop().unwrap()).unwrap();
    held.push(pool.acquire().unwrap());

    for buf in held {
        pool.release(buf).unwrap();
    }
    assert_eq!(pool.free_count(), 16);
}

#[tokio::test]
async fn lock_timeout_never_early() {
    let lock = ResourceLock::new("sensor", ());
    let _held = lock.acquire(WaitLimit::Forever).await.unwrap();

    for ms in [1u64, 15, 40] {
        let start = Instant::now();
        let res = lock.acquire(WaitLimit::millis(ms)).await;
        assert!(matches!(res, Err(CoreError::Timeout)));
        assert!(start.elapsed() >= Duration::from_millis(ms));
    }
}

#[tokio::test]
async fn silent_uart_times_out_and_stays_sending() {
    let channel = RendezvousChannel::new();
    let mut tx = RendezvousTransmitter::new(FakeUart::silent(&channel), &channel);

    tx.submit(b"frame").unwrap();
    let start = Instant::now();
    assert_eq!(
        tx.await_completion(WaitLimit::millis(30)).await,
        Err(CoreError::Timeout)
    );
    assert!(start.elapsed() >= Duration::from_millis(30));
    assert_eq!(tx.state(), ChannelState::Sending);
}

#[tokio::test]
async fn busy_uart_is_soft_and_block_still_returns() {
    let registry = TaskRegistry::new();
    let ids = tasks(&registry, &["T"]);
    let log = Log::new(MockTime::new(), LoggerConfig::default());
    let channel = RendezvousChannel::new();
    let uart = FakeUart::new(&channel);
    uart.busy.set(true);
    let mut tx = RendezvousTransmitter::new(uart, &channel);
    let lamp = Lamp::default();

    log.log(&ids[0], "dropped").await.unwrap();
    assert_eq!(
        log.service_next(&mut tx, &lamp).await,
        Ok(Delivery::TransmitFailed { sequence: 0 })
    );
    assert_eq!(lamp.soft.get(), 1);
    assert_eq!(log.pool().free_count(), 16);
    assert_eq!(tx.state(), ChannelState::Idle);
}
