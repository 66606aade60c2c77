//! Idle-timeout receive framing
//!
//! Splits a byte stream into frames by line silence: a frame starts with
//! the first byte after the previous one closed and ends once no byte has
//! arrived for the idle timeout. Frames are cut from one receive region;
//! bytes since the previous report go out as `RxReady`, and a full region
//! ends reception with `RxBufRequest` followed by `RxDisabled`.
//!
//! The clock is injected through [`IdleTimer`] so the same loop runs on the
//! target and against scripted readers on the host.

use embassy_futures::select::{select, Either};
use embedded_io_async::Read;
use triad_hal::uart::SerialEvent;

/// Source of the idle deadline
#[allow(async_fn_in_trait)]
pub trait IdleTimer {
    /// Complete once `us` microseconds have passed
    async fn wait_us(&mut self, us: u32);
}

/// Receiver of framing notifications
#[allow(async_fn_in_trait)]
pub trait RxSink<E> {
    async fn deliver(&mut self, event: SerialEvent<'_>);

    /// A read failed; any frame in progress is closed
    fn read_failed(&mut self, error: E) {
        let _ = error;
    }
}

/// Why a region stopped receiving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegionEnd {
    /// Every byte of the region was used
    Full,
    /// The reader reported end of stream
    EndOfStream,
}

/// Receive into `region` until it is full
///
/// The first byte of each frame is awaited without a deadline.
pub async fn receive_region<R, T, S>(
    rx: &mut R,
    region: &mut [u8],
    idle_timeout_us: u32,
    timer: &mut T,
    sink: &mut S,
) -> RegionEnd
where
    R: Read,
    T: IdleTimer,
    S: RxSink<R::Error>,
{
    let capacity = region.len();
    let mut filled = 0;

    while filled < capacity {
        let start = filled;

        match rx.read(&mut region[filled..]).await {
            Ok(0) => return RegionEnd::EndOfStream,
            Ok(n) => filled += n,
            Err(e) => {
                sink.read_failed(e);
                continue;
            }
        }

        let mut ended = false;
        while filled < capacity {
            let next = select(rx.read(&mut region[filled..]), timer.wait_us(idle_timeout_us)).await;
            match next {
                Either::First(Ok(0)) => {
                    ended = true;
                    break;
                }
                Either::First(Ok(n)) => filled += n,
                Either::First(Err(e)) => {
                    sink.read_failed(e);
                    break;
                }
                // Line went quiet
                Either::Second(()) => break,
            }
        }

        sink.deliver(SerialEvent::RxReady(&region[start..filled])).await;
        if ended {
            return RegionEnd::EndOfStream;
        }
    }

    sink.deliver(SerialEvent::RxBufRequest).await;
    sink.deliver(SerialEvent::RxDisabled).await;
    RegionEnd::Full
}
