//! Application task: green heartbeat plus a log line per cycle

use crate::core::fault::{Fault, OrFault};
use crate::core::log_pipeline::LogPipeline;
use crate::core::task::TaskId;
use crate::core::traits::TimeSource;
use crate::devices::led::{Led, LedBank};
use crate::platform::traits::GpioInterface;
use core::convert::Infallible;
use embassy_time::{Duration, Timer};

/// Toggle the green LED, log a heartbeat, sleep; forever
///
/// Any failure ends the task with a [`Fault`].
pub async fn heartbeat_task<C, G, const N: usize, const S: usize, const Q: usize>(
    id: TaskId,
    leds: &LedBank<G>,
    log: &LogPipeline<C, N, S, Q>,
    interval: Duration,
) -> Result<Infallible, Fault>
where
    C: TimeSource,
    G: GpioInterface,
{
    loop {
        leds.toggle(Led::Green)
            .await
            .or_fault_code("BSP_LED_Toggle failed:")?;

        log.log(&id, "App Task Heartbeat")
            .await
            .or_fault_code("logger_log failed:")?;

        Timer::after(interval).await;
    }
}
