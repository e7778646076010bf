//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 blend-runtime 覆盖率
//! - `blend-check`: 检查 blend 文件（语法、重复条目、未知属性）

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use blend_runtime::{APPLY_NONE, BlendParser, BlendTables};
use walkdir::WalkDir;

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    let status = cmd.status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-runtime" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "blend-runtime", "--all-features", "--html"]);
            run(
                "cargo llvm-cov -p blend-runtime --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "blend-check" => {
            let path = args.next();
            blend_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 blend-runtime 覆盖率报告
  blend-check     检查 blend 文件

BLEND-CHECK:
  cargo xtask blend-check [path]

  不带参数：检查 locale/ 下所有 blend*.txt
  带路径参数：检查指定文件或目录

  检查内容：
    - 语法错误（缺值、未闭合记录、字段位置错误）
    - 重复的 item_vnum（只有第一条生效）
    - 重复的 bonus_index
    - 未识别的 apply_type（按 NONE 处理）
"#
    );
}

//=============================================================================
// blend-check 命令实现
//=============================================================================

/// 默认检查目录（相对于 workspace root）
const DEFAULT_LOCALE_DIR: &str = "locale";

/// 检查结果
#[derive(Default)]
struct BlendCheckResult {
    files_checked: usize,
    errors: usize,
    warnings: usize,
}

/// 执行 blend 文件检查
fn blend_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_blend_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let dir = Path::new(DEFAULT_LOCALE_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认目录不存在: {}\n请在 workspace 根目录运行，或指定文件路径",
                    dir.display()
                );
            }
            collect_blend_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到 blend 文件（blend*.txt）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个 blend 文件...\n", files.len());

    let mut result = BlendCheckResult::default();
    for file in &files {
        check_blend_file(file, &mut result);
    }

    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个文件", result.files_checked);
    if result.errors > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", result.errors, result.warnings);
        anyhow::bail!("blend 检查发现错误");
    } else if result.warnings > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", result.warnings);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
    Ok(())
}

/// 收集目录下所有 blend*.txt
fn collect_blend_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            name.starts_with("blend") && name.ends_with(".txt")
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// 检查单个文件
fn check_blend_file(file: &Path, result: &mut BlendCheckResult) {
    let id = file.display().to_string();
    result.files_checked += 1;

    let mut parser = BlendParser::new();
    let tables = match parser.load(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("[ERROR] {id}: {e}");
            result.errors += 1;
            return;
        }
    };

    for warning in parser.warnings() {
        eprintln!("[WARN] {id}: {warning}");
        result.warnings += 1;
    }
    for message in lint_tables(&tables) {
        eprintln!("[WARN] {id}: {message}");
        result.warnings += 1;
    }

    eprintln!(
        "[INFO] {id}: {} 个合成道具, {} 个奖励池 bonus",
        tables.blends.len(),
        tables.bonuses.len()
    );
}

/// 语法之外的可疑内容
fn lint_tables(tables: &BlendTables) -> Vec<String> {
    let mut messages = Vec::new();

    let mut vnums = HashSet::new();
    for entry in &tables.blends {
        if !vnums.insert(entry.item_vnum) {
            messages.push(format!(
                "item_vnum {} 重复，只有第一条生效",
                entry.item_vnum
            ));
        }
        if entry.apply_type == APPLY_NONE {
            messages.push(format!("item_vnum {} 的 apply_type 未识别", entry.item_vnum));
        }
    }

    let mut indices = HashSet::new();
    for record in &tables.bonuses {
        if !indices.insert(record.bonus_index) {
            messages.push(format!("bonus_index {} 重复", record.bonus_index));
        }
        if record.apply_type == APPLY_NONE {
            messages.push(format!(
                "bonus_index {} 的 apply_type 未识别",
                record.bonus_index
            ));
        }
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use blend_runtime::{BlendEntry, BonusRecord};

    fn entry(item_vnum: u32, apply_type: i32) -> BlendEntry {
        BlendEntry {
            item_vnum,
            apply_type,
            apply_values: [1; 5],
            apply_durations: [1; 5],
        }
    }

    #[test]
    fn test_lint_duplicates_and_unknown_types() {
        let tables = BlendTables {
            blends: vec![entry(100, 7), entry(100, 7), entry(200, APPLY_NONE)],
            bonuses: vec![
                BonusRecord {
                    bonus_index: 1,
                    apply_type: 3,
                    apply_values: [1; 5],
                    apply_durations: [1; 5],
                },
                BonusRecord {
                    bonus_index: 1,
                    apply_type: 3,
                    apply_values: [1; 5],
                    apply_durations: [1; 5],
                },
            ],
        };
        let messages = lint_tables(&tables);
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("item_vnum 100"));
        assert!(messages[1].contains("item_vnum 200"));
        assert!(messages[2].contains("bonus_index 1"));
    }

    #[test]
    fn test_lint_clean_tables() {
        let tables = BlendTables {
            blends: vec![entry(100, 7), entry(200, 8)],
            bonuses: Vec::new(),
        };
        assert!(lint_tables(&tables).is_empty());
    }
}
