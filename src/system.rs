//! System bring-up
//!
//! [`System`] owns every shared object: the log pipeline, the LED bank, the
//! sensor bus, the task table, and the UART rendezvous channel. The board
//! builds it once before starting the executor, places it in static storage,
//! and hands `&'static` references to its tasks and to the UART interrupt.
//!
//! ```ignore
//! static SYSTEM: StaticCell<System<EmbassyTime, Output, I2c, Ms8607>> = StaticCell::new();
//!
//! let system = SYSTEM.init(System::new(SystemConfig::default(), EmbassyTime, pins, i2c, mux, ms8607)?);
//! let ids = system.register_tasks()?;
//! UART_ISR.bind(system.uart_channel());
//! spawner.spawn(app(system, ids.app))?;
//! spawner.spawn(sensor(system, ids.sensor))?;
//! spawner.spawn(logger(system, ids.logger, uart))?;
//! ```

use crate::config::{SystemConfig, MAX_TASKS};
use crate::core::error::Result;
use crate::core::fault::FaultEscalation;
use crate::core::log_pipeline::{LogPipeline, SystemLog};
use crate::core::rendezvous::{RendezvousChannel, RendezvousTransmitter};
use crate::core::task::{TaskId, TaskRegistry};
use crate::core::traits::TimeSource;
use crate::devices::led::{LedBank, LedPins};
use crate::devices::sensor::{EnvironmentalSensor, MuxLines, SensorBus};
use crate::log_info;
use crate::platform::traits::{GpioInterface, I2cInterface, UartTransmitter};
use crate::tasks::{heartbeat_task, logger_task, sensor_task};
use core::convert::Infallible;

/// Ids of the three long-lived tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskIds {
    pub app: TaskId,
    pub sensor: TaskId,
    pub logger: TaskId,
}

/// Escalation wired to the system log and fault lamp
pub type SystemEscalation<'a, C, G> = FaultEscalation<'a, SystemLog<C>, LedBank<G>, MAX_TASKS>;

pub struct System<C, G, I, D> {
    config: SystemConfig,
    log: SystemLog<C>,
    leds: LedBank<G>,
    sensors: SensorBus<I, G, D>,
    registry: TaskRegistry<MAX_TASKS>,
    uart_channel: RendezvousChannel,
}

impl<C, G, I, D> System<C, G, I, D>
where
    C: TimeSource,
    G: GpioInterface,
    I: I2cInterface,
    D: EnvironmentalSensor<I>,
{
    /// Initialize the peripherals and build the shared objects
    ///
    /// Runs in the single-task phase; nothing here contends.
    pub fn new(
        config: SystemConfig,
        clock: C,
        led_pins: LedPins<G>,
        i2c: I,
        mux: MuxLines<G>,
        ms8607: D,
    ) -> Result<Self> {
        let leds = LedBank::init(led_pins)?;
        let sensors = SensorBus::init(i2c, mux, ms8607, config.sensor)?;

        log_info!(
            "bring-up: {} log blocks, queue depth {}",
            crate::config::NUM_LOG_BUFFERS,
            crate::config::LOG_QUEUE_DEPTH
        );

        Ok(Self {
            config,
            log: LogPipeline::new(clock, config.logger),
            leds,
            sensors,
            registry: TaskRegistry::new(),
            uart_channel: RendezvousChannel::new(),
        })
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn log(&self) -> &SystemLog<C> {
        &self.log
    }

    pub fn leds(&self) -> &LedBank<G> {
        &self.leds
    }

    pub fn sensors(&self) -> &SensorBus<I, G, D> {
        &self.sensors
    }

    pub fn registry(&self) -> &TaskRegistry<MAX_TASKS> {
        &self.registry
    }

    /// Completion handler for the UART "transmit complete" interrupt
    pub fn uart_channel(&self) -> &RendezvousChannel {
        &self.uart_channel
    }

    /// Register the application, sensor, and logger tasks
    pub fn register_tasks(&self) -> Result<TaskIds> {
        Ok(TaskIds {
            app: self.registry.register(self.config.app_task)?,
            sensor: self.registry.register(self.config.sensor_task)?,
            logger: self.registry.register(self.config.logger_task)?,
        })
    }

    pub fn escalation(&self) -> SystemEscalation<'_, C, G> {
        FaultEscalation::new(&self.log, &self.leds, &self.registry)
    }

    /// Bind the logger's transmitter to the system channel
    pub fn uart_transmitter<H: UartTransmitter>(&self, hardware: H) -> RendezvousTransmitter<'_, H> {
        RendezvousTransmitter::new(hardware, &self.uart_channel)
    }

    /// Application task under supervision
    pub async fn run_app(&self, id: TaskId) -> Infallible {
        let body = heartbeat_task(
            id,
            &self.leds,
            &self.log,
            self.config.app_task.polling_interval,
        );
        self.escalation().supervise(id, body).await
    }

    /// Sensor task under supervision
    pub async fn run_sensor(&self, id: TaskId) -> Infallible {
        let body = sensor_task(
            id,
            &self.sensors,
            &self.log,
            self.config.sensor_task.polling_interval,
        );
        self.escalation().supervise(id, body).await
    }

    /// Logger task under supervision
    pub async fn run_logger<H: UartTransmitter>(&self, id: TaskId, hardware: H) -> Infallible {
        let mut tx = self.uart_transmitter(hardware);
        let body = logger_task(&self.log, &mut tx, &self.leds);
        self.escalation().supervise(id, body).await
    }
}
