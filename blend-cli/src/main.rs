//! # Blend CLI
//!
//! blend.txt 检查与抽取模拟工具。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p blend-cli -- check locale/blend.txt
//! cargo run -p blend-cli -- dump locale/blend.txt
//! cargo run -p blend-cli -- roll locale/blend.txt 50821 --count 20 --seed 1
//! cargo run -p blend-cli -- pool locale/blend.txt --count 20
//! cargo run -p blend-cli -- tiers --count 100000
//!
//! # 或安装后直接使用
//! cargo install --path blend-cli
//! blend check locale/blend.txt
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use blend_runtime::{BlendConfig, BlendParser, BlendStore, TIER_COUNT, select_tier};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(name = "blend")]
#[command(about = "blend.txt 检查与抽取模拟工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件（JSON，可选）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 输出 debug 日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 检查文件能否完整加载
    Check {
        /// blend 文件路径
        file: PathBuf,
    },

    /// 以 JSON 输出解析后的表
    Dump {
        /// blend 文件路径
        file: PathBuf,
    },

    /// 模拟道具创建时的属性抽取
    Roll {
        /// blend 文件路径
        file: PathBuf,

        /// 道具 vnum
        vnum: u32,

        /// 抽取次数
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// 随机种子（不指定则使用系统随机源）
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// 模拟奖励池道具被使用时的抽取
    Pool {
        /// blend 文件路径
        file: PathBuf,

        /// 抽取次数
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// 随机种子（不指定则使用系统随机源）
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// 统计五档权重的实际分布
    Tiers {
        /// 抽取次数
        #[arg(short = 'n', long, default_value = "10000")]
        count: usize,

        /// 随机种子（不指定则使用系统随机源）
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = real_main(cli) {
        eprintln!("❌ {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => BlendConfig::load(path),
        None => BlendConfig::default(),
    };
    config.validate()?;

    match cli.command {
        Commands::Check { file } => check(&file),
        Commands::Dump { file } => dump(&file),
        Commands::Roll {
            file,
            vnum,
            count,
            seed,
        } => roll(config, &file, vnum, count, seed),
        Commands::Pool { file, count, seed } => pool(config, &file, count, seed),
        Commands::Tiers { count, seed } => {
            tiers(count, seed);
            Ok(())
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

fn load_store(config: BlendConfig, file: &Path) -> anyhow::Result<BlendStore> {
    let store = BlendStore::new(config);
    store
        .reload_from(file)
        .with_context(|| format!("加载失败: {}", file.display()))?;
    Ok(store)
}

/// 检查文件
fn check(file: &Path) -> anyhow::Result<()> {
    let mut parser = BlendParser::new();
    let tables = parser
        .load(file)
        .with_context(|| format!("加载失败: {}", file.display()))?;

    for warning in parser.warnings() {
        println!("⚠️ {warning}");
    }
    println!("✅ {}", file.display());
    println!("   合成道具: {}", tables.blends.len());
    println!("   奖励池 bonus: {}", tables.bonuses.len());
    Ok(())
}

/// 输出 JSON
fn dump(file: &Path) -> anyhow::Result<()> {
    let tables = BlendParser::new()
        .load(file)
        .with_context(|| format!("加载失败: {}", file.display()))?;
    println!("{}", serde_json::to_string_pretty(&tables)?);
    Ok(())
}

/// 模拟道具创建
fn roll(
    config: BlendConfig,
    file: &Path,
    vnum: u32,
    count: usize,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let store = load_store(config, file)?;

    if store.is_pooled_item(vnum) {
        println!("vnum {vnum} 是奖励池道具，属性在使用时抽取（见 `blend pool`）");
        return Ok(());
    }
    if !store.item_exists(vnum) {
        anyhow::bail!("vnum {vnum} 不在合成表中");
    }

    let mut rng = make_rng(seed);
    for i in 1..=count {
        if let Some(roll) = store.resolve_blend_with(vnum, &mut rng) {
            println!("{i:>4}: {roll}");
        }
    }
    Ok(())
}

/// 模拟奖励池道具使用
fn pool(config: BlendConfig, file: &Path, count: usize, seed: Option<u64>) -> anyhow::Result<()> {
    let store = load_store(config, file)?;
    let mut rng = make_rng(seed);

    for i in 1..=count {
        let roll = store.get_pool_bonus_with(&mut rng)?;
        println!("{i:>4}: {roll}");
    }
    Ok(())
}

/// 统计档位分布
fn tiers(count: usize, seed: Option<u64>) {
    let mut rng = make_rng(seed);
    let mut counts = [0usize; TIER_COUNT];
    for _ in 0..count {
        counts[select_tier(&mut rng)] += 1;
    }

    println!("tier  count     freq");
    for (tier, n) in counts.iter().enumerate() {
        let freq = if count > 0 {
            *n as f64 / count as f64 * 100.0
        } else {
            0.0
        };
        println!("{tier:>4}  {n:>8}  {freq:>6.2}%");
    }
}
