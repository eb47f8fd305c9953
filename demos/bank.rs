//! # Example: bank
//!
//! Runs the default bank (3 tellers, 50 customers, door and safe of 2) and
//! prints one line per step, followed by a short report.
//!
//! ## Flow
//! ```text
//! Simulation::run()
//!     ├─► Bank::start()              ─► 3 × TellerActor
//!     ├─► Bank::submit_customer(..)  ─► 50 × CustomerActor
//!     ├─► wait customers ─► Bank::inject_shutdown()
//!     ├─► wait tellers   ─► Bank::close()
//!     └─► subscriber_listener ─► LogWriter.on_event()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example bank
//! ```

use std::sync::Arc;

use bankvisor::{Config, LogWriter, Simulation};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::default();

    let report = Simulation::builder(cfg)
        .with_subscriber(Arc::new(LogWriter::new()))
        .build()?
        .run()
        .await?;

    println!();
    println!(
        "served {} customers in {:?}",
        report.customers_served, report.elapsed
    );
    for teller in &report.tellers {
        println!("  Teller {}: {} customers", teller.id, teller.served);
    }
    println!(
        "peak occupancy: door {}, safe {}, manager {}",
        report.peak_door, report.peak_safe, report.peak_manager
    );
    Ok(())
}
