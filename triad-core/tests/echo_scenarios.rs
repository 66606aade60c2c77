//! Echo engine scenarios against a recording transport

use heapless::Vec;
use proptest::prelude::*;
use triad_core::echo::{EchoConfig, EchoOutcome, SerialEchoEngine};
use triad_hal::uart::{SerialEvent, SerialTransport, Timeout};

const IDLE_US: u32 = 500;

/// Records what the engine asked of the transport
#[derive(Default)]
struct RecordingUart {
    armed: u32,
    sent: std::vec::Vec<std::vec::Vec<u8>>,
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

fn engine() -> SerialEchoEngine<64> {
    SerialEchoEngine::new(EchoConfig {
        idle_timeout_us: IDLE_US,
        ..Default::default()
    })
}

#[test]
fn frame_arriving_mid_transmit_is_dropped() {
    let mut engine = engine();
    let mut uart = RecordingUart::default();
    engine.start(&mut uart).unwrap();

    engine
        .handle(SerialEvent::RxReady(b"first"), &mut uart)
        .unwrap();
    let rx_before = *engine.receive_buffer();
    let tx_before = *engine.transmit_buffer();

    let out = engine
        .handle(SerialEvent::RxReady(&[1, 2, 3, 4, 5]), &mut uart)
        .unwrap();
    assert_eq!(out, EchoOutcome::Dropped(5));
    assert!(engine.is_tx_busy());
    assert_eq!(engine.receive_buffer(), &rx_before);
    assert_eq!(engine.transmit_buffer(), &tx_before);

    engine.handle(SerialEvent::TxDone(5), &mut uart).unwrap();
    assert_eq!(uart.sent, vec![b"first".to_vec()]);
    assert_eq!(engine.stats().dropped, 1);
}

#[test]
fn second_echo_waits_for_completion() {
    let mut engine = engine();
    let mut uart = RecordingUart::default();

    engine.handle(SerialEvent::RxReady(b"one"), &mut uart).unwrap();
    engine.handle(SerialEvent::RxReady(b"two"), &mut uart).unwrap();
    engine.handle(SerialEvent::TxDone(3), &mut uart).unwrap();
    engine
        .handle(SerialEvent::RxReady(b"three"), &mut uart)
        .unwrap();

    assert_eq!(uart.sent, vec![b"one".to_vec(), b"three".to_vec()]);
}

#[derive(Debug, Clone)]
enum Step {
    Frame(Vec<u8, 8>),
    Done,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 1..8)
            .prop_map(|v| Step::Frame(Vec::from_slice(&v).unwrap())),
        Just(Step::Done),
    ]
}

proptest! {
    // Whatever the interleaving, at most one transmit is outstanding, and
    // exactly the frames that arrived while idle are echoed, in order.
    #[test]
    fn at_most_one_transmit_in_flight(steps in proptest::collection::vec(step(), 0..40)) {
        let mut engine = engine();
        let mut uart = RecordingUart::default();
        let mut in_flight = false;
        let mut expected = std::vec::Vec::new();

        for s in steps {
            match s {
                Step::Frame(bytes) => {
                    let out = engine.handle(SerialEvent::RxReady(&bytes), &mut uart).unwrap();
                    if in_flight {
                        prop_assert_eq!(out, EchoOutcome::Dropped(bytes.len()));
                    } else {
                        expected.push(bytes.to_vec());
                        in_flight = true;
                    }
                }
                Step::Done => {
                    engine.handle(SerialEvent::TxDone(0), &mut uart).unwrap();
                    in_flight = false;
                }
            }
            prop_assert_eq!(engine.is_tx_busy(), in_flight);
        }

        prop_assert_eq!(uart.sent, expected);
    }
}
