//! Sensor task: reset the MS8607 once, then log a reading every cycle

use crate::core::fault::{Fault, OrFault};
use crate::core::log_pipeline::LogPipeline;
use crate::core::task::TaskId;
use crate::core::traits::TimeSource;
use crate::devices::sensor::{EnvironmentalSensor, Sensor, SensorBus};
use crate::platform::traits::{GpioInterface, I2cInterface};
use core::convert::Infallible;
use embassy_time::{Duration, Timer};

pub async fn sensor_task<C, I, G, D, const N: usize, const S: usize, const Q: usize>(
    id: TaskId,
    sensors: &SensorBus<I, G, D>,
    log: &LogPipeline<C, N, S, Q>,
    interval: Duration,
) -> Result<Infallible, Fault>
where
    C: TimeSource,
    I: I2cInterface,
    G: GpioInterface,
    D: EnvironmentalSensor<I>,
{
    let sensor = Sensor::Ms8607;
    let mut iterations: u32 = 0;

    sensors
        .reset(sensor)
        .await
        .or_fault("Failed to reset sensor")?;

    loop {
        let data = sensors
            .read(sensor)
            .await
            .or_fault("Failed to read sensor")?;

        if let Some(temperature) = data.temperature {
            log.log_with_float(&id, "Temperature:", temperature)
                .await
                .or_fault("Failed to log temperature")?;
        }
        if let Some(humidity) = data.humidity {
            log.log_with_float(&id, "Humidity:", humidity)
                .await
                .or_fault("Failed to log humidity")?;
        }
        if let Some(pressure) = data.pressure {
            log.log_with_float(&id, "Pressure:", pressure)
                .await
                .or_fault("Failed to log pressure")?;
        }

        iterations = iterations.wrapping_add(1);
        // Best effort: a dropped counter line is not worth a fault
        let _ = log
            .log_with_integer(&id, "Number of Sensor Readings =", iterations)
            .await;

        Timer::after(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggerConfig, SensorConfig, TaskConfig};
    use crate::core::error::CoreError;
    use crate::core::task::TaskRegistry;
    use crate::core::timeout::{bounded, WaitLimit};
    use crate::core::traits::MockTime;
    use crate::devices::sensor::mock::MockSensor;
    use crate::devices::sensor::{MuxLines, SensorData};
    use crate::platform::error::{I2cError, PlatformError};
    use crate::platform::mock::{MockGpio, MockI2c};
    use crate::platform::traits::I2cConfig;
    use std::string::String;
    use std::vec::Vec;

    fn bus(sensor: MockSensor) -> SensorBus<MockI2c, MockGpio, MockSensor> {
        SensorBus::init(
            MockI2c::new(I2cConfig::default()),
            MuxLines {
                enable: MockGpio::new_output(),
                select_a: MockGpio::new_output(),
                select_b: MockGpio::new_output(),
            },
            sensor,
            SensorConfig {
                reset_settle: Duration::from_millis(1),
                lock_wait: WaitLimit::Forever,
            },
        )
        .unwrap()
    }

    fn task_id(registry: &TaskRegistry<2>) -> TaskId {
        registry
            .register(TaskConfig::new("Sensor Task", 1, Duration::from_millis(50)))
            .unwrap()
    }

    #[tokio::test]
    async fn logs_valid_fields_and_counter() {
        let registry = TaskRegistry::new();
        let id = task_id(&registry);
        let sensors = bus(MockSensor::new().with_reading(SensorData {
            temperature: Some(22.25),
            humidity: None,
            pressure: Some(1001.5),
        }));
        let log = LogPipeline::<MockTime, 16, 128, 20>::new(MockTime::new(), LoggerConfig::default());

        // One cycle, then parked in the polling delay
        let run = sensor_task(id, &sensors, &log, Duration::from_millis(50));
        assert!(bounded(WaitLimit::millis(20), run).await.is_err());

        let mut lines = Vec::new();
        while let Some(env) = log.try_dequeue() {
            lines.push(
                log.read_envelope(&env, |b| String::from_utf8(b.to_vec()).unwrap())
                    .unwrap(),
            );
            log.release(env).unwrap();
        }
        assert_eq!(
            lines,
            [
                "[0][Sensor Task] Temperature: 22.250000\n",
                "[0][Sensor Task] Pressure: 1001.500000\n",
                "[0][Sensor Task] Number of Sensor Readings = 1\n",
            ]
        );
    }

    #[tokio::test]
    async fn missing_sensor_faults_before_first_read() {
        let registry = TaskRegistry::new();
        let id = task_id(&registry);
        let sensors = bus(MockSensor::disconnected());
        let log = LogPipeline::<MockTime, 16, 128, 20>::new(MockTime::new(), LoggerConfig::default());

        let fault = sensor_task(id, &sensors, &log, Duration::from_millis(50))
            .await
            .unwrap_err();

        assert_eq!(fault.reason, "Failed to reset sensor");
        assert_eq!(
            fault.error,
            CoreError::Peripheral(PlatformError::I2c(I2cError::Nack))
        );
        assert_eq!(log.pending(), 0);
    }

    #[tokio::test]
    async fn counter_line_failure_is_ignored() {
        let registry = TaskRegistry::new();
        let id = task_id(&registry);
        let sensors = bus(MockSensor::new().with_reading(SensorData {
            temperature: Some(1.0),
            humidity: None,
            pressure: None,
        }));
        // One block: the temperature line takes it, the counter line gets none
        let log = LogPipeline::<MockTime, 1, 128, 4>::new(MockTime::new(), LoggerConfig::default());

        let run = sensor_task(id, &sensors, &log, Duration::from_millis(50));
        // Still running (sleeping) rather than faulted
        assert!(bounded(WaitLimit::millis(20), run).await.is_err());
        assert_eq!(log.pending(), 1);
    }
}
