//! Board bring-up
//!
//! Runs the startup stages in order and records each one in the
//! [`BootSequence`]. The red LED (PG14) is claimed right after the clocks
//! are up so that any later failure can be shown on it.

use defmt::{error, info};
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::mode::Blocking;
use embassy_stm32::usart;

use quartz_core::config::{BoardConfig, Clocks};
use quartz_core::scheduler::Dispatcher;
use quartz_core::state::{BootError, BootEvent, BootSequence};
use quartz_core::traits::Millis;
use quartz_hal_stm32f4::gpio::{BoardLed, Led};
use quartz_hal_stm32f4::rcc;
use quartz_hal_stm32f4::systick::SysTickSource;
use quartz_hal_stm32f4::uart::{usart_config, SerialTx, UartBusError};
use quartz_hal_stm32f4::{UartConfig, UartTx};

use crate::config::BOARD;
use crate::tasks::{self, TASK_COUNT};

/// Peripherals owned by the dispatch loop and handed to every task
pub struct Board {
    /// Green LED (PG13), toggled by the heartbeat task
    pub heartbeat_led: BoardLed,
    /// Red LED (PG14), lit only on a fault
    pub error_led: BoardLed,
    /// USART1 console, transmit only
    pub serial: SerialTx,
}

/// A failed bring-up
pub struct Fault {
    /// What went wrong
    pub error: BootError,
    /// Red LED, if it was claimed before the failure
    pub indicator: Option<BoardLed>,
}

impl From<BootError> for Fault {
    fn from(error: BootError) -> Self {
        Self {
            error,
            indicator: None,
        }
    }
}

/// A fully brought-up system, ready to enter the loop
pub struct App {
    dispatcher: Dispatcher<Millis, Board, TASK_COUNT>,
    tick: SysTickSource,
}

impl App {
    /// Hand control to the dispatch loop
    pub fn run(self) -> ! {
        let App { dispatcher, tick } = self;
        info!("Entering dispatch loop at tick {}", dispatcher.previous_tick());
        dispatcher.run(&tick)
    }
}

/// Bring the board up from reset
pub fn bring_up(boot: &mut BootSequence) -> Result<App, Fault> {
    let config = &BOARD;

    let (p, clocks) = boot.advance(BootEvent::ClocksConfigured, init_clocks(config))?;
    info!(
        "Clocks: SYSCLK {} Hz, HCLK {} Hz, PCLK1 {} Hz, PCLK2 {} Hz",
        clocks.sysclk, clocks.hclk, clocks.pclk1, clocks.pclk2
    );
    info!(
        "Regulator {}, flash {}",
        config.clock.voltage_scale,
        clocks.flash_access()
    );

    let error_led = Led::new(Output::new(p.PG14, Level::Low, Speed::Low));

    let stages = |boot: &mut BootSequence| -> Result<_, BootError> {
        let tick = boot.advance(BootEvent::TickStarted, start_tick(config, &clocks))?;
        info!("SysTick running at {} Hz", config.tick.rate_hz);

        let heartbeat_led = Led::new(Output::new(p.PG13, Level::Low, Speed::Low));
        let uart_config = usart_config(&UartConfig::with_baudrate(config.uart.baudrate));
        let console = usart::UartTx::new_blocking(p.USART1, p.PA9, uart_config)
            .map_err(UartBusError::from)
            .and_then(|tx| init_console(tx, &clocks))
            .map_err(|e| {
                error!("Console UART: {}", e);
                BootError::Uart
            });
        let serial = boot.advance(BootEvent::PeripheralsReady, console)?;

        let tasks = boot.advance(BootEvent::TasksRegistered, tasks::table(config))?;
        for task in tasks.iter() {
            info!("Task '{}' every {} ms", task.name(), task.period());
        }

        Ok((tick, heartbeat_led, serial, tasks))
    };

    match stages(boot) {
        Ok((tick, heartbeat_led, serial, tasks)) => {
            let board = Board {
                heartbeat_led,
                error_led,
                serial,
            };
            let dispatcher = Dispatcher::start(&tick, board, tasks);
            Ok(App { dispatcher, tick })
        }
        Err(error) => Err(Fault {
            error,
            indicator: Some(error_led),
        }),
    }
}

/// Validate the configuration and start the clock tree
///
/// Embassy brings up the oscillator, PLL and buses; the regulator scale and
/// the flash accelerator are applied on top.
fn init_clocks(
    config: &BoardConfig,
) -> Result<(embassy_stm32::Peripherals, Clocks), BootError> {
    config.validate()?;
    let (hal_config, clocks) = rcc::embassy_config(&config.clock)?;
    let p = embassy_stm32::init(hal_config);
    rcc::apply_voltage_scale(config.clock.voltage_scale);
    rcc::enable_flash_accelerator(&clocks.flash_access());
    Ok((p, clocks))
}

/// Take SysTick from the core peripherals and start the millisecond count
fn start_tick(config: &BoardConfig, clocks: &Clocks) -> Result<SysTickSource, BootError> {
    let core = cortex_m::Peripherals::take().ok_or(BootError::CorePeripherals)?;
    SysTickSource::start(core.SYST, clocks.hclk, config.tick.rate_hz).map_err(|e| {
        error!("SysTick: {}", e);
        BootError::TickSource
    })
}

/// Wrap the console transmitter and print the boot banner
fn init_console(
    tx: usart::UartTx<'static, Blocking>,
    clocks: &Clocks,
) -> Result<SerialTx, UartBusError> {
    let mut serial = SerialTx::new(tx);

    write!(
        serial,
        "Quartz Arc up, SYSCLK {} MHz\r\n",
        clocks.sysclk / 1_000_000
    )?;
    serial.flush()?;

    Ok(serial)
}
