//! Schema upgrades keyed on `PRAGMA user_version`.

use anyhow::{bail, Context, Result};
use rusqlite::Connection;

/// Schema scripts in order; entry `n` upgrades version `n` to `n + 1`.
const SCHEMAS: &[(&str, &str)] = &[("schema_v1.sql", include_str!("schemas/schema_v1.sql"))];

fn latest_version() -> i32 {
    SCHEMAS.len() as i32
}

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let found: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("cannot read preference schema version")?;
    let latest = latest_version();

    if found > latest {
        bail!("preference store uses schema v{found}, this build only knows up to v{latest}");
    }
    if found == latest {
        return Ok(());
    }

    let tx = conn
        .transaction()
        .context("cannot start preference schema upgrade")?;

    for (index, (name, script)) in SCHEMAS.iter().enumerate().skip(found as usize) {
        tx.execute_batch(script)
            .with_context(|| format!("preference schema step {name} (to v{}) failed", index + 1))?;
    }

    tx.pragma_update(None, "user_version", latest)
        .context("cannot record preference schema version")?;
    tx.commit().context("cannot commit preference schema upgrade")?;

    Ok(())
}
