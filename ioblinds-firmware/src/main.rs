//! ioblinds - Window Blind Controller Firmware
//!
//! Drives one window blind through two relays on an MCP23017 expander,
//! estimating its position from travel time, and exposes it to an
//! accessory bridge over UART.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Instant;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use ioblinds_core::BlindController;
use ioblinds_drivers::expander::Mcp23017;
use ioblinds_hal_rp2040::flash::FlashStorage;

use crate::board::{BoardI2c, I2cResources};
use crate::config::{load_position, log_config_summary, ConfigPersistence};
use crate::store::LinkedStore;

/// Embedded default configuration (compiled into firmware)
/// Edit blind.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../blind.toml");

mod board;
mod channels;
mod config;
mod store;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ioblinds firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Load configuration from flash (or use embedded defaults)
    let mut persistence = ConfigPersistence::new(FlashStorage::new(p.FLASH, p.DMA_CH0));
    let config = persistence.load(EMBEDDED_CONFIG).await;
    let mut storage = persistence.into_storage();
    log_config_summary(&config);

    // Expander on the configured I2C bus
    let i2c = BoardI2c::new(
        config.expander.device,
        I2cResources {
            i2c0: p.I2C0,
            sda0: p.PIN_4,
            scl0: p.PIN_5,
            i2c1: p.I2C1,
            sda1: p.PIN_6,
            scl1: p.PIN_7,
        },
    );
    let mut expander = Mcp23017::new(i2c, config.expander.address);
    match expander.init() {
        Ok(()) => info!("MCP23017 initialized at {:#x}", expander.address()),
        // Pin setup below retries the bus and reports per pin
        Err(e) => warn!("MCP23017 init failed: {:?}", e),
    }

    let stored = load_position(&mut storage, &config.name).await;
    if let Err(e) = stored {
        warn!("Could not read stored position: {:?}", e);
    }

    let name = config.name.clone();
    let blind = match BlindController::new(
        config,
        expander,
        LinkedStore::new(stored),
        Instant::now().as_millis(),
    ) {
        Ok(blind) => blind,
        Err(e) => {
            error!("Blind controller setup failed: {:?}", e);
            return;
        }
    };
    info!(
        "Blind at {}%, {:?}",
        blind.current_position(),
        blind.position_state()
    );

    // Setup UART for the accessory bridge
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for bridge communication");

    spawner.spawn(tasks::persist_task(storage, name)).unwrap();
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::controller_task(blind)).unwrap();

    info!("All tasks spawned, firmware running");
}
