//! Report journal
//!
//! User-visible events are appended to a JSON-lines file, one file per
//! report day. A report day starts at a configurable local hour, so the
//! events of one night land in one file named after the morning's date.
//!
//! ```text
//! {"version":3,"startingTime":"2026/10/18 17:00:00 +02:00"}
//! {"dateTime":"2026/10/18 22:41:07 +02:00","event":{"type":"control",...}}
//! ```
//!
//! Events are queued by [`ReportQueue`] (cheap to clone, thread-safe) and
//! written by [`ReportJournal::process`] once per tick.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone};
use sandman_core::traits::{ReportSink, ScheduleAction};
use sandman_core::Action;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Report file format version
pub const REPORT_VERSION: u32 = 3;

const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S %Z";

/// An event waiting to be written
#[derive(Debug, Clone)]
struct PendingItem {
    time: DateTime<Local>,
    event: Value,
}

/// Thread-safe queue of report events
#[derive(Debug, Clone, Default)]
pub struct ReportQueue {
    items: Arc<Mutex<Vec<PendingItem>>>,
}

impl ReportQueue {
    fn push(&self, event: Value) {
        self.lock().push(PendingItem {
            time: Local::now(),
            event,
        });
    }

    fn take(&self) -> Vec<PendingItem> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PendingItem>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ReportSink for ReportQueue {
    fn control_event(&mut self, control: &str, action: Action, source: &str) {
        self.push(json!({
            "type": "control",
            "control": control,
            "action": action.report_name(),
            "source": source,
        }));
    }

    fn schedule_event(&mut self, action: ScheduleAction) {
        self.push(json!({
            "type": "schedule",
            "action": action.name(),
        }));
    }

    fn status_event(&mut self) {
        self.push(json!({ "type": "status" }));
    }
}

/// Report date for a moment: the next day once past the starting hour
pub fn effective_date<Tz: TimeZone>(now: &DateTime<Tz>, starting_hour: u32) -> NaiveDate {
    let local = now.naive_local();
    if local.time() >= starting_time_of_day(starting_hour) {
        local
            .date()
            .checked_add_days(Days::new(1))
            .unwrap_or(local.date())
    } else {
        local.date()
    }
}

/// Most recent start of a report day
pub fn starting_time<Tz: TimeZone>(now: &DateTime<Tz>, starting_hour: u32) -> DateTime<Tz> {
    let day = effective_date(now, starting_hour)
        .checked_sub_days(Days::new(1))
        .unwrap_or(now.naive_local().date());
    let start = day.and_time(starting_time_of_day(starting_hour));
    now.timezone()
        .from_local_datetime(&start)
        .earliest()
        .unwrap_or_else(|| now.clone())
}

fn starting_time_of_day(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Report file name for a report date
pub fn file_name(date: NaiveDate) -> String {
    format!("sandman{}.rpt", date.format("%Y-%m-%d"))
}

struct OpenReport {
    date: NaiveDate,
    file: File,
}

/// Writer that owns the report files
pub struct ReportJournal {
    dir: PathBuf,
    starting_hour: u32,
    queue: ReportQueue,
    current: Option<OpenReport>,
}

impl ReportJournal {
    pub fn new(dir: impl Into<PathBuf>, starting_hour: u32) -> Self {
        Self {
            dir: dir.into(),
            starting_hour,
            queue: ReportQueue::default(),
            current: None,
        }
    }

    /// Queue handle for recording events
    pub fn queue(&self) -> ReportQueue {
        self.queue.clone()
    }

    /// Write queued events and rotate the file if the report day changed
    pub fn process(&mut self) {
        self.process_at(&Local::now());
    }

    /// Same as [`process`](Self::process) at a given time
    pub fn process_at(&mut self, now: &DateTime<Local>) {
        if let Some(report) = self.current.as_mut() {
            let items = self.queue.take();
            if let Err(e) = write_items(&mut report.file, &items) {
                warn!("Failed to write {} report items: {}", items.len(), e);
            }
        }
        self.open_file(now);
    }

    /// Path of the report file for a moment
    pub fn path_for(&self, now: &DateTime<Local>) -> PathBuf {
        self.dir
            .join(file_name(effective_date(now, self.starting_hour)))
    }

    fn open_file(&mut self, now: &DateTime<Local>) {
        let date = effective_date(now, self.starting_hour);
        if self.current.as_ref().is_some_and(|r| r.date == date) {
            return;
        }
        if let Some(old) = self.current.take() {
            info!("Closing report file for {}", old.date);
        }

        let path = self.path_for(now);
        let existed = path.exists();
        info!(
            "{} report file {}",
            if existed { "Opening" } else { "Creating" },
            path.display()
        );

        match open_report(&self.dir, &path, existed, &starting_time(now, self.starting_hour)) {
            Ok(file) => self.current = Some(OpenReport { date, file }),
            Err(e) => warn!("Failed to open report file {}: {}", path.display(), e),
        }
    }
}

fn open_report(
    dir: &Path,
    path: &Path,
    existed: bool,
    starting: &DateTime<Local>,
) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if !existed {
        let header = json!({
            "version": REPORT_VERSION,
            "startingTime": starting.format(TIME_FORMAT).to_string(),
        });
        writeln!(file, "{}", header)?;
    }
    Ok(file)
}

fn write_items(file: &mut File, items: &[PendingItem]) -> io::Result<()> {
    for item in items {
        let line = json!({
            "dateTime": item.time.format(TIME_FORMAT).to_string(),
            "event": item.event,
        });
        writeln!(file, "{}", line)?;
    }
    file.flush()
}
