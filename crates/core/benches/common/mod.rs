use std::env;
use std::time::Duration;

use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, Throughput};

use vizseg_core::model::{Borders, BoxNode, Color, FontInfo, Page};
use vizseg_core::utils::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

impl BenchTier {
    pub fn from_env() -> Self {
        match env::var("VIZSEG_BENCH_TIER").as_deref() {
            Ok("full") => Self::Full,
            _ => Self::Quick,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub tier: BenchTier,
    pub seed: u64,
    pub sample_size: usize,
    pub measurement: Duration,
}

pub fn bench_config() -> BenchConfig {
    let tier = BenchTier::from_env();
    let seed = env::var("VIZSEG_BENCH_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE);
    let (sample_size, measurement) = match tier {
        BenchTier::Quick => (20, Duration::from_secs(3)),
        BenchTier::Full => (30, Duration::from_secs(8)),
    };
    BenchConfig {
        tier,
        seed,
        sample_size,
        measurement,
    }
}

pub fn configure_group<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, cfg: &BenchConfig) {
    group.sample_size(cfg.sample_size);
    group.measurement_time(cfg.measurement);
}

pub fn pages_throughput(pages: usize) -> Throughput {
    Throughput::Elements(pages as u64)
}

#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    pub fn gen_range(&mut self, min: i32, max: i32) -> i32 {
        min + (self.next_u64() % (max - min + 1) as u64) as i32
    }
}

/// A page of `sections` bordered boxes in two columns, each holding a few
/// lines of words.
pub fn generate_page(seed: u64, sections: usize) -> Page {
    let mut rng = XorShift64::new(seed);
    let font = FontInfo::sized(12.0);
    let mut children = Vec::with_capacity(sections);
    let mut y = [0i32; 2];
    for i in 0..sections {
        let col = i % 2;
        let x1 = col as i32 * 410;
        let lines = rng.gen_range(2, 6);
        let height = lines * 18 + 10;
        let frame = Rect::new(x1, y[col], x1 + 399, y[col] + height - 1);
        let mut words = Vec::new();
        for line in 0..lines {
            let ly = frame.y1 + 5 + line * 18;
            let mut x = frame.x1 + 5;
            loop {
                let w = rng.gen_range(15, 60);
                if x + w > frame.x2 - 5 {
                    break;
                }
                words.push(BoxNode::text(Rect::new(x, ly, x + w - 1, ly + 13), "word", font));
                x += w + rng.gen_range(3, 8);
            }
        }
        let mut section = BoxNode::element(frame).with_children(words);
        if rng.next_u64() % 2 == 0 {
            section = section.with_borders(Borders::new(1, 1, 1, 1));
        } else {
            section = section.with_background(Color::new(240, 240, 240));
        }
        children.push(section);
        y[col] += height + rng.gen_range(8, 24);
    }
    let height = y[0].max(y[1]).max(1);
    Page::new(810, height, BoxNode::element(Rect::new(0, 0, 809, height - 1)).with_children(children))
}
