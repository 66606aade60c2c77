//! Idle-timeout framing against a scripted line, feeding the echo engine

use core::convert::Infallible;
use core::future::poll_fn;
use core::task::Poll;
use std::cell::RefCell;
use std::collections::VecDeque;

use embassy_futures::block_on;
use embedded_io_async::{ErrorType, Read};
use triad_core::echo::{EchoConfig, EchoOutcome, SerialEchoEngine};
use triad_core::framing::{receive_region, IdleTimer, RegionEnd, RxSink};
use triad_hal::uart::{SerialEvent, SerialTransport, Timeout};

const IDLE_US: u32 = 500;

/// What happens on the line next
enum Wire {
    Bytes(Vec<u8>),
    /// Silence for this many microseconds
    Gap(u32),
}

type Line = RefCell<VecDeque<Wire>>;

/// Reader that hands out scripted bytes and stalls on gaps
struct ScriptedRx<'a> {
    line: &'a Line,
}

impl ErrorType for ScriptedRx<'_> {
    type Error = Infallible;
}

impl Read for ScriptedRx<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        poll_fn(|_| {
            let mut line = self.line.borrow_mut();
            let n = match line.front_mut() {
                None => return Poll::Ready(Ok(0)),
                Some(Wire::Gap(_)) => return Poll::Pending,
                Some(Wire::Bytes(bytes)) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    bytes.drain(..n);
                    n
                }
            };
            if matches!(line.front(), Some(Wire::Bytes(b)) if b.is_empty()) {
                line.pop_front();
            }
            Poll::Ready(Ok(n))
        })
        .await
    }
}

/// Timer that lets scripted gaps elapse
struct ScriptedClock<'a> {
    line: &'a Line,
}

impl IdleTimer for ScriptedClock<'_> {
    async fn wait_us(&mut self, us: u32) {
        let mut waited = 0u32;
        poll_fn(|_| {
            let mut line = self.line.borrow_mut();
            while let Some(Wire::Gap(gap)) = line.front() {
                waited += *gap;
                line.pop_front();
                if waited >= us {
                    return Poll::Ready(());
                }
            }
            Poll::Pending
        })
        .await
    }
}

/// Owned copy of a framing notification
#[derive(Debug, Clone, PartialEq, Eq)]
enum Seen {
    Ready(Vec<u8>),
    BufRequest,
    Disabled,
}

#[derive(Default)]
struct Collect {
    seen: Vec<Seen>,
}

impl RxSink<Infallible> for Collect {
    async fn deliver(&mut self, event: SerialEvent<'_>) {
        self.seen.push(match event {
            SerialEvent::RxReady(data) => Seen::Ready(data.to_vec()),
            SerialEvent::RxBufRequest => Seen::BufRequest,
            SerialEvent::RxDisabled => Seen::Disabled,
            other => panic!("framing never reports {:?}", other),
        });
    }
}

fn line(script: Vec<Wire>) -> Line {
    RefCell::new(script.into())
}

fn run(line: &Line, capacity: usize) -> (RegionEnd, Vec<Seen>) {
    let mut region = vec![0u8; capacity];
    let mut rx = ScriptedRx { line };
    let mut clock = ScriptedClock { line };
    let mut sink = Collect::default();
    let end = block_on(receive_region(&mut rx, &mut region, IDLE_US, &mut clock, &mut sink));
    (end, sink.seen)
}

/// Records what the engine asked of the transport
#[derive(Default)]
struct RecordingUart {
    armed: u32,
    sent: Vec<Vec<u8>>,
}

impl SerialTransport for RecordingUart {
    type Error = ();

    fn enable_receive(&mut self, _capacity: usize, idle_timeout_us: u32) -> Result<(), ()> {
        assert_eq!(idle_timeout_us, IDLE_US);
        self.armed += 1;
        Ok(())
    }

    fn transmit(&mut self, data: &[u8], timeout: Timeout) -> Result<(), ()> {
        assert_eq!(timeout, Timeout::Forever);
        self.sent.push(data.to_vec());
        Ok(())
    }
}

#[test]
fn gap_longer_than_idle_gives_two_echoes() {
    // 0x41 0x42 0x43 at 90us spacing, then 600us of silence, then 0x44
    let line = line(vec![
        Wire::Bytes(vec![0x41]),
        Wire::Gap(90),
        Wire::Bytes(vec![0x42]),
        Wire::Gap(90),
        Wire::Bytes(vec![0x43]),
        Wire::Gap(600),
        Wire::Bytes(vec![0x44]),
        Wire::Gap(600),
    ]);
    let (end, seen) = run(&line, 64);

    assert_eq!(end, RegionEnd::EndOfStream);
    assert_eq!(seen, vec![Seen::Ready(b"ABC".to_vec()), Seen::Ready(b"D".to_vec())]);

    let mut engine = SerialEchoEngine::<64>::new(EchoConfig {
        idle_timeout_us: IDLE_US,
        ..Default::default()
    });
    let mut uart = RecordingUart::default();
    engine.start(&mut uart).unwrap();

    for frame in &seen {
        let Seen::Ready(bytes) = frame else { unreachable!() };
        let out = engine.handle(SerialEvent::RxReady(bytes), &mut uart).unwrap();
        assert!(matches!(out, EchoOutcome::Echoing { .. }));
        let out = engine
            .handle(SerialEvent::TxDone(bytes.len()), &mut uart)
            .unwrap();
        assert_eq!(out, EchoOutcome::Rearmed);
    }

    assert_eq!(uart.sent, vec![b"ABC".to_vec(), b"D".to_vec()]);
    // Initial arm plus one per completed transmit
    assert_eq!(uart.armed, 3);
}

#[test]
fn short_gaps_stay_in_one_frame() {
    let line = line(vec![
        Wire::Bytes(vec![1, 2]),
        Wire::Gap(200),
        Wire::Bytes(vec![3]),
        Wire::Gap(499),
        Wire::Bytes(vec![4]),
    ]);
    let (_, seen) = run(&line, 64);
    assert_eq!(seen, vec![Seen::Ready(vec![1, 2, 3, 4])]);
}

#[test]
fn silence_adds_up_across_gaps() {
    let line = line(vec![
        Wire::Bytes(vec![1]),
        Wire::Gap(300),
        Wire::Gap(300),
        Wire::Bytes(vec![2]),
    ]);
    let (_, seen) = run(&line, 64);
    assert_eq!(seen, vec![Seen::Ready(vec![1]), Seen::Ready(vec![2])]);
}

#[test]
fn full_region_stops_reception() {
    let line = line(vec![Wire::Bytes(vec![1, 2, 3, 4, 5, 6])]);
    let (end, seen) = run(&line, 4);

    assert_eq!(end, RegionEnd::Full);
    assert_eq!(
        seen,
        vec![Seen::Ready(vec![1, 2, 3, 4]), Seen::BufRequest, Seen::Disabled]
    );
    // Bytes past the region stay on the line
    assert!(matches!(line.borrow().front(), Some(Wire::Bytes(b)) if b == &[5, 6]));
}

#[test]
fn region_fills_across_frames() {
    let line = line(vec![
        Wire::Bytes(vec![1, 2]),
        Wire::Gap(600),
        Wire::Bytes(vec![3, 4, 5]),
    ]);
    let (end, seen) = run(&line, 4);

    assert_eq!(end, RegionEnd::Full);
    assert_eq!(
        seen,
        vec![
            Seen::Ready(vec![1, 2]),
            Seen::Ready(vec![3, 4]),
            Seen::BufRequest,
            Seen::Disabled,
        ]
    );
}

#[test]
fn quiet_line_reports_nothing() {
    let (end, seen) = run(&line(vec![]), 8);
    assert_eq!(end, RegionEnd::EndOfStream);
    assert!(seen.is_empty());
}
