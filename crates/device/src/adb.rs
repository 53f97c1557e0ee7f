use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

use crate::{
    extract_hierarchy, find_by_index, parse_uiautomator_xml, DeviceDriver, DeviceError, Result,
    UiElement,
};

/// Drives an Android device through the `adb` binary.
pub struct AdbDriver {
    adb: PathBuf,
    serial: Option<String>,
    last_snapshot: Mutex<Vec<UiElement>>,
}

impl AdbDriver {
    /// Locates `adb` on PATH. `serial` selects a device when several are attached.
    pub fn new(serial: Option<String>) -> Result<Self> {
        let adb = which::which("adb").map_err(|_| DeviceError::AdbMissing)?;
        Ok(Self::with_binary(adb, serial))
    }

    pub fn with_binary(adb: PathBuf, serial: Option<String>) -> Self {
        Self {
            adb,
            serial,
            last_snapshot: Mutex::new(Vec::new()),
        }
    }

    async fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        let mut cmd = Command::new(&self.adb);
        if let Some(serial) = &self.serial {
            cmd.arg("-s").arg(serial);
        }
        let out = cmd
            .args(args)
            .output()
            .await
            .map_err(|e| DeviceError::CommandFailed(e.to_string()))?;
        if !out.status.success() {
            return Err(DeviceError::CommandFailed(
                String::from_utf8_lossy(&out.stderr).into(),
            ));
        }
        debug!("adb {}", args.join(" "));
        Ok(out.stdout)
    }

    async fn input(&self, args: &[String]) -> Result<()> {
        let mut full = vec!["shell".to_string(), "input".to_string()];
        full.extend_from_slice(args);
        self.run(&full).await.map(|_| ())
    }
}

/// `input text` treats spaces as separators and the device shell expands
/// metacharacters, so both are escaped.
pub(crate) fn escape_input_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' => out.push_str("%s"),
            '\\' | '"' | '\'' | '(' | ')' | '<' | '>' | '|' | ';' | '&' | '*' | '~' | '$' | '`' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[async_trait]
impl DeviceDriver for AdbDriver {
    async fn snapshot(&self) -> Result<Vec<UiElement>> {
        let args = ["exec-out", "uiautomator", "dump", "/dev/tty"].map(String::from);
        let stdout = self.run(&args).await?;
        let output = String::from_utf8_lossy(&stdout);
        let xml = extract_hierarchy(&output)
            .ok_or_else(|| DeviceError::Parse(format!("no hierarchy in dump: {}", output.trim())))?;
        let elements = parse_uiautomator_xml(xml)?;
        *self.last_snapshot.lock() = elements.clone();
        Ok(elements)
    }

    async fn tap(&self, x: i32, y: i32) -> Result<()> {
        self.input(&["tap".into(), x.to_string(), y.to_string()]).await
    }

    async fn swipe(&self, x1: i32, y1: i32, x2: i32, y2: i32, duration_ms: u32) -> Result<()> {
        self.input(&[
            "swipe".into(),
            x1.to_string(),
            y1.to_string(),
            x2.to_string(),
            y2.to_string(),
            duration_ms.to_string(),
        ])
        .await
    }

    async fn type_text(&self, text: &str, target_index: usize) -> Result<()> {
        let target = find_by_index(&self.last_snapshot.lock(), target_index)
            .cloned()
            .ok_or(DeviceError::UnknownElement(target_index))?;
        self.tap_element(&target).await?;
        self.input(&["text".into(), escape_input_text(text)]).await
    }
}
