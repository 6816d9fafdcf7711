//! Shared fixtures: header-only BAM files and stand-in stage tools.

#![allow(dead_code)]

use std::fs::{self, File};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use noodles::{bam, sam};
use tempfile::TempDir;

/// Write a header-only, coordinate-sorted BAM with the given references
pub fn write_bam(path: &Path, references: &[(&str, usize)]) {
    let mut text = String::from("@HD\tVN:1.6\tSO:coordinate\n");
    for (name, length) in references {
        text.push_str(&format!("@SQ\tSN:{name}\tLN:{length}\n"));
    }
    let header: sam::Header = text.parse().expect("valid SAM header");

    let mut writer = File::create(path)
        .map(bam::io::Writer::new)
        .expect("create BAM");
    writer.write_header(&header).expect("write BAM header");
}

/// A scratch directory holding fake `rsem-bam2wig` / `wigToBigWig` scripts.
///
/// Each script exits 0 when run without arguments (the dependency probe) and
/// appends its argument list to `<name>.log`.
pub struct FakeTools {
    pub dir: TempDir,
}

impl FakeTools {
    /// Tools that succeed and write their output file
    pub fn working() -> Self {
        Self::with_bodies(
            "printf 'variableStep chrom=chr1\\n1\\t2\\n' > \"$2\"",
            "printf 'bigwig\\n' > \"$3\"",
        )
    }

    /// Custom shell snippets run after the argument logging
    pub fn with_bodies(bam2wig: &str, wig_to_bigwig: &str) -> Self {
        let tools = Self {
            dir: TempDir::new().expect("temp dir"),
        };
        tools.write_script("rsem-bam2wig", bam2wig);
        tools.write_script("wigToBigWig", wig_to_bigwig);
        tools
    }

    fn write_script(&self, name: &str, body: &str) {
        let path = self.dir.path().join(name);
        let log = self.log_path(name);
        let script = format!(
            "#!/bin/sh\n[ \"$#\" -eq 0 ] && exit 0\nprintf '%s\\n' \"$*\" >> '{}'\n{body}\n",
            log.display()
        );
        fs::write(&path, script).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    }

    pub fn log_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{name}.log"))
    }

    /// Argument lines the tool was called with (empty if never called)
    pub fn calls(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.log_path(name))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// `bam2bigwig` with these tools first on the PATH
    pub fn command(&self) -> Command {
        let path = match std::env::var_os("PATH") {
            Some(existing) => {
                let mut dirs = vec![self.dir.path().to_path_buf()];
                dirs.extend(std::env::split_paths(&existing));
                std::env::join_paths(dirs).expect("join PATH")
            }
            None => self.dir.path().as_os_str().to_owned(),
        };

        let mut cmd = Command::cargo_bin("bam2bigwig").expect("binary built");
        cmd.env("PATH", path)
            .env_remove("BAM2BIGWIG_BAM2WIG")
            .env_remove("BAM2BIGWIG_WIGTOBIGWIG");
        cmd
    }
}
