//! Core surface telemetry
//!
//! Cinematic numbers for the status bar and the vertical rail. Drawn once
//! per session from an injected RNG and never tied to boot phase timing.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use crate::{Labels, Zone};

const SEED_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Seven upper-case hex characters
pub fn session_seed<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..7)
        .map(|_| char::from(SEED_CHARS[rng.gen_range(0..SEED_CHARS.len())]))
        .collect()
}

/// `IRR.YYYY.MM.DD-XXXXXXX`
pub fn build_tag(date: NaiveDate, seed: &str) -> String {
    format!("IRR.{:04}.{:02}.{:02}-{seed}", date.year(), date.month(), date.day())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telemetry {
    pub lat: String,
    pub loss: String,
    pub uptime: String,
    pub drift: String,
    pub canon: String,
    pub region: String,
    pub tz: String,
    pub build: String,
    pub access: String,
    pub instance: String,
    /// Session seed shown in the status bar
    pub seed: String,
}

impl Telemetry {
    pub fn generate<R: Rng + ?Sized>(date: NaiveDate, zone: &Zone, rng: &mut R) -> Self {
        let lat = format!("{}ms", rng.gen_range(18..36));
        let loss = format!("{:.2}%", rng.gen_range(0.0..0.12));
        let uptime = format!("{:.1}%", rng.gen_range(94.0..99.0));
        let drift = format!("{:.3}", rng.gen_range(0.0..0.9));
        let build = build_tag(date, &session_seed(rng));
        let access = format!("{}{}", session_seed(rng), session_seed(rng));
        let instance = format!("NUVE_CORE_{}", session_seed(rng));
        let seed = session_seed(rng);

        Telemetry {
            lat,
            loss,
            uptime,
            drift,
            canon: "partial".to_string(),
            region: zone.region.clone(),
            tz: zone.name.clone(),
            build,
            access,
            instance,
            seed,
        }
    }

    /// Vertical rail text for the selected year
    pub fn rail_line(&self, labels: &Labels, year: i32) -> String {
        format!(
            "{}: {year} • {}: {} • {}: {} • {}: {} • {}: {} • {}: {} • {}: {}",
            labels.instance.to_uppercase(),
            labels.region.to_uppercase(),
            self.region,
            labels.tz.to_uppercase(),
            self.tz,
            labels.build.to_uppercase(),
            self.build,
            labels.uptime.to_uppercase(),
            self.uptime,
            labels.access.to_uppercase(),
            self.access,
            labels.mesh.to_uppercase(),
            self.instance,
        )
    }

    /// Status bar pills, left to right
    pub fn status_pills(&self, window: i32) -> [(&'static str, String); 5] {
        [
            ("window", window.to_string()),
            ("lat", self.lat.clone()),
            ("loss", self.loss.clone()),
            ("uptime", self.uptime.clone()),
            ("drift", self.drift.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irreverso_core::Language;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[test]
    fn test_build_tag() {
        assert_eq!(build_tag(date(), "0A1B2C3"), "IRR.2026.03.07-0A1B2C3");
    }

    #[test]
    fn test_generate_ranges() {
        let zone = Zone::new("America/Sao_Paulo");
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let t = Telemetry::generate(date(), &zone, &mut rng);

            let lat: u32 = t.lat.trim_end_matches("ms").parse().unwrap();
            assert!((18..36).contains(&lat));
            let uptime: f64 = t.uptime.trim_end_matches('%').parse().unwrap();
            assert!((94.0..=99.0).contains(&uptime));
            let drift: f64 = t.drift.parse().unwrap();
            assert!((0.0..=0.9).contains(&drift));

            assert!(t.build.starts_with("IRR.2026.03.07-"));
            assert_eq!(t.build.len(), "IRR.2026.03.07-".len() + 7);
            assert_eq!(t.access.len(), 14);
            assert!(t.instance.starts_with("NUVE_CORE_"));
            assert!(t.seed.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
            assert_eq!(t.region, "AMERICA");
        }
    }

    #[test]
    fn test_same_rng_same_telemetry() {
        let zone = Zone::new("UTC");
        let a = Telemetry::generate(date(), &zone, &mut StdRng::seed_from_u64(9));
        let b = Telemetry::generate(date(), &zone, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rail_line() {
        let zone = Zone::new("Europe/Lisbon");
        let t = Telemetry::generate(date(), &zone, &mut StdRng::seed_from_u64(1));
        let line = t.rail_line(Labels::for_language(Language::En), 2044);
        assert!(line.starts_with("INSTANCE: 2044 • REGION: EUROPE • TZ: Europe/Lisbon • BUILD: IRR.2026.03.07-"));
        assert!(line.contains("STABILITY: "));
        assert!(line.ends_with(&t.instance));

        let pills = t.status_pills(2034);
        assert_eq!(pills[0], ("window", "2034".to_string()));
    }
}
