//! Typed key-value preference store backed by SQLite.
//!
//! The connection lives on its own thread. Every read or write is a closure
//! queued to that thread; the caller awaits the closure's result.

use std::{
    path::PathBuf,
    sync::{mpsc, Arc, Mutex, PoisonError},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use rusqlite::Connection;
use tokio::sync::oneshot;

mod entries;
mod migrations;
mod values;

use migrations::run_migrations;
pub use values::{PrefError, PrefKind, PrefValue};

type PrefJob = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum Request {
    Run(PrefJob),
    Close,
}

struct Worker {
    requests: mpsc::Sender<Request>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Worker {
    fn drop(&mut self) {
        let handle = self
            .thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(handle) = handle else {
            return;
        };

        // Pending jobs queued before `Close` still run.
        if self.requests.send(Request::Close).is_err() {
            warn!("Preference worker already gone at close");
        }
        if handle.join().is_err() {
            error!("Preference worker panicked");
        }
    }
}

#[derive(Clone)]
pub struct Preferences {
    worker: Arc<Worker>,
}

impl Preferences {
    /// Opens (or creates) the store at `db_path`, creating parent directories as needed.
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("cannot create directory for preferences at {}", parent.display())
            })?;
        }

        let label = db_path.display().to_string();
        Self::start(label, move || Connection::open(&db_path))
    }

    /// Opens a private store that disappears with the handle.
    pub fn open_in_memory() -> Result<Self> {
        Self::start(":memory:".into(), Connection::open_in_memory)
    }

    fn start<F>(label: String, connect: F) -> Result<Self>
    where
        F: FnOnce() -> rusqlite::Result<Connection> + Send + 'static,
    {
        let (requests, inbox) = mpsc::channel::<Request>();
        let (opened_tx, opened_rx) = mpsc::channel::<Result<()>>();

        let thread = thread::Builder::new()
            .name("stopwatch-prefs".into())
            .spawn(move || match prepare_connection(connect) {
                Ok(mut conn) => {
                    if opened_tx.send(Ok(())).is_ok() {
                        serve(&mut conn, &inbox);
                    }
                }
                Err(err) => {
                    let _ = opened_tx.send(Err(err));
                }
            })
            .context("cannot spawn preference worker")?;

        opened_rx
            .recv()
            .context("preference worker stopped while opening the store")??;

        info!("Preferences ready at {label}");

        Ok(Self {
            worker: Arc::new(Worker {
                requests,
                thread: Mutex::new(Some(thread)),
            }),
        })
    }

    /// Runs `job` on the preference thread and returns its result.
    pub async fn execute<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        let request = Request::Run(Box::new(move |conn| {
            // The caller may have been cancelled; its result is then dropped.
            let _ = reply_tx.send(job(conn));
        }));

        self.worker
            .requests
            .send(request)
            .map_err(|_| anyhow!("preference worker is no longer running"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("preference worker stopped before answering"))?
    }
}

fn prepare_connection<F>(connect: F) -> Result<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let mut conn = connect().context("cannot open preference store")?;

    match conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
        row.get::<_, String>(0)
    }) {
        Ok(mode) => debug!("Preference journal mode: {mode}"),
        Err(err) => warn!("Preference store keeps its default journal mode: {err}"),
    }

    run_migrations(&mut conn).context("cannot bring preference schema up to date")?;
    Ok(conn)
}

fn serve(conn: &mut Connection, inbox: &mpsc::Receiver<Request>) {
    while let Ok(request) = inbox.recv() {
        match request {
            Request::Run(job) => job(conn),
            Request::Close => break,
        }
    }
    debug!("Preference worker closed");
}
