//! Report delivery.
//!
//! A successful diagnosis ends with the report being handed to a [`ReportSink`]. The CLI
//! saves it into a directory; the web front-end turns it into an attachment response.

use crate::error::{EcgError, EcgResult};
use crate::report::DiagnosisReport;
use std::io::Write;
use std::path::PathBuf;

/// Destination for a generated report.
pub trait ReportSink {
    type Output;

    /// Deliver `report`. Called at most once per successful submission.
    fn deliver(&self, report: DiagnosisReport) -> EcgResult<Self::Output>;
}

/// Saves reports into a directory under their report filename.
///
/// The report is first written to a temporary file inside the target directory and then
/// renamed into place, so a failed write never leaves a partial report behind. The temporary
/// file is removed on every error path when its handle is dropped. An existing report with the
/// same name is replaced.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Final location for a report filename inside this directory.
    pub fn target_path(&self, filename: &str) -> PathBuf {
        self.dir.join(safe_file_name(filename))
    }
}

impl ReportSink for DirectorySink {
    type Output = PathBuf;

    fn deliver(&self, report: DiagnosisReport) -> EcgResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(EcgError::ReportWrite)?;

        let target = self.target_path(report.filename());
        let mut staged = tempfile::Builder::new()
            .prefix(".ecg-report-")
            .suffix(".part")
            .tempfile_in(&self.dir)
            .map_err(EcgError::ReportWrite)?;

        staged
            .write_all(report.bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(EcgError::ReportWrite)?;

        staged
            .persist(&target)
            .map_err(|e| EcgError::ReportWrite(e.error))?;

        tracing::info!(
            path = %target.display(),
            size = report.bytes().len(),
            "saved diagnosis report"
        );

        Ok(target)
    }
}

/// Replace characters that would let a patient name escape the target directory or that
/// common filesystems reject.
fn safe_file_name(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::path::Path;

    fn report(filename: &str, body: &'static [u8]) -> DiagnosisReport {
        DiagnosisReport::new(filename.to_string(), Bytes::from_static(body))
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .count()
    }

    #[test]
    fn deliver_writes_report_under_its_filename() {
        let temp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(temp.path());

        let path = sink
            .deliver(report("ECG_Report_Ravi.pdf", b"%PDF-1.7"))
            .unwrap();

        assert_eq!(path, temp.path().join("ECG_Report_Ravi.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
        assert_eq!(leftover_temp_files(temp.path()), 0);
    }

    #[test]
    fn deliver_creates_missing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(temp.path().join("reports/today"));

        let path = sink.deliver(report("ECG_Report_A.pdf", b"%PDF")).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn repeated_delivery_replaces_previous_report() {
        let temp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(temp.path());

        sink.deliver(report("ECG_Report_A.pdf", b"%PDF first")).unwrap();
        let path = sink.deliver(report("ECG_Report_A.pdf", b"%PDF second")).unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"%PDF second");
    }

    #[test]
    fn path_separators_cannot_escape_directory() {
        let temp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(temp.path());

        let path = sink
            .deliver(report("ECG_Report_../../etc/passwd.pdf", b"%PDF"))
            .unwrap();

        assert_eq!(path.parent().unwrap(), temp.path());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "ECG_Report_.._.._etc_passwd.pdf"
        );
    }

    #[test]
    fn failed_delivery_leaves_no_temp_file() {
        let temp = tempfile::tempdir().unwrap();
        // A directory already occupying the target name makes the final rename fail.
        std::fs::create_dir(temp.path().join("ECG_Report_B.pdf")).unwrap();
        std::fs::write(temp.path().join("ECG_Report_B.pdf/keep"), b"x").unwrap();
        let sink = DirectorySink::new(temp.path());

        let err = sink.deliver(report("ECG_Report_B.pdf", b"%PDF")).unwrap_err();

        assert!(matches!(err, EcgError::ReportWrite(_)));
        assert_eq!(leftover_temp_files(temp.path()), 0);
    }
}
