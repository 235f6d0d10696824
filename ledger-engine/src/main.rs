//! Ledger inspection tool
//!
//! Opens the configured database read-mostly and logs a summary of open
//! orders, account balances, low-stock items and unpaid payroll.

use ledger_engine::config::EngineConfig;
use ledger_engine::logging::init_logger;
use ledger_engine::{OrderFilter, OrderManager};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::from_env();
    init_logger(&config.log_level, config.json_logs);

    tracing::info!(db_path = %config.db_path, "Opening ledger database");
    if let Some(parent) = std::path::Path::new(&config.db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let manager = OrderManager::new(&config.db_path)?;
    let loaded = manager.warm_catalog_cache()?;
    tracing::info!(catalog_items = loaded, epoch = %manager.epoch(), "Engine ready");

    let query = manager.query();

    let open = query.open_orders()?;
    tracing::info!(count = open.len(), "Open orders");
    for order in &open {
        tracing::info!(
            order_id = order.id,
            kind = %order.kind,
            status = %order.status,
            counterparty = %order.counterparty_name,
            total = order.total,
            "  order"
        );
    }

    for account in query.accounts()? {
        tracing::info!(account_id = account.id, name = %account.name, balance = account.balance, "Account");
    }

    let low = query.low_stock_items()?;
    for item in &low {
        tracing::warn!(
            item_id = item.id,
            name = %item.name,
            quantity = item.quantity,
            min_stock = item.min_stock,
            "Item at or below minimum stock"
        );
    }

    let unpaid = query.unpaid_payroll()?;
    if !unpaid.is_empty() {
        tracing::info!(count = unpaid.len(), "Unpaid payroll records");
    }

    let total_orders = query.orders(&OrderFilter::default())?.len();
    tracing::info!(
        total_orders,
        open_orders = open.len(),
        low_stock = low.len(),
        "Summary"
    );
    Ok(())
}
