//! Temporal-access screen
//!
//! Shown after the boot sequence, or directly on a recent visit. It reveals
//! its log in three stages and redirects to the core surface:
//! - stage 0 at open: identity, region, zone, year and temporal drift
//! - stage 1 at 5s: autonomy indices
//! - stage 2 at 10s: closing message and the redirect countdown
//! - redirect to `/core` at 15s
//!
//! The countdown refreshes every 250ms. All timers live in one
//! [`TimerQueue`] owned by the screen.

use std::time::Duration;

use irreverso_core::{Language, SeqTime};
use irreverso_time::{TimerQueue, TimerScope};

use crate::{timeline, Route, Zone};

pub const STAGE_ONE_AT: Duration = Duration::from_secs(5);
pub const STAGE_TWO_AT: Duration = Duration::from_secs(10);
pub const REDIRECT_AFTER: Duration = Duration::from_secs(15);
pub const COUNTDOWN_TICK: Duration = Duration::from_millis(250);

/// Years between `year` and the terminal year, never negative
pub fn temporal_drift(year: i32) -> i32 {
    (timeline::LAST_YEAR - year).max(0)
}

#[derive(Debug)]
pub struct AccessText {
    pub header: &'static str,
    pub bio: &'static str,
    pub region: &'static str,
    pub tz: &'static str,
    pub year: &'static str,
    pub drift: &'static str,
    pub years: &'static str,
    pub cog: &'static str,
    pub cog_no: &'static str,
    pub access: &'static str,
    pub partial: &'static str,
    pub intervention: &'static str,
    pub none: &'static str,
    pub gai: &'static str,
    pub pai: &'static str,
    pub stability: &'static str,
    pub within: &'static str,
    pub latent: &'static str,
    pub redirect: &'static str,
    pub seconds: &'static str,
}

impl AccessText {
    pub fn for_language(language: Language) -> &'static AccessText {
        match language {
            Language::Pt => &PT,
            Language::En => &EN,
            Language::Es => &ES,
        }
    }
}

static EN: AccessText = AccessText {
    header: "NUVE OS // TEMPORAL INSTANCE",
    bio: "Biological instance detected.",
    region: "Region",
    tz: "Timezone",
    year: "Local year confirmed",
    drift: "Temporal drift",
    years: "years",
    cog: "Cognitive integration",
    cog_no: "not initiated",
    access: "Access permission",
    partial: "partial",
    intervention: "Intervention required",
    none: "none",
    gai: "Global Autonomy Index (2026)",
    pai: "Projected Autonomy Index (2107)",
    stability: "Stability drift",
    within: "within tolerance",
    latent: "Consciousness process: latent",
    redirect: "Automatic redirect to /core in",
    seconds: "seconds.",
};

static PT: AccessText = AccessText {
    header: "NUVE OS // INSTÂNCIA TEMPORAL",
    bio: "Instância biológica detectada.",
    region: "Região",
    tz: "Timezone",
    year: "Ano local confirmado",
    drift: "Desvio temporal",
    years: "anos",
    cog: "Integração cognitiva",
    cog_no: "não iniciada",
    access: "Permissão de acesso",
    partial: "parcial",
    intervention: "Intervenção necessária",
    none: "nenhuma",
    gai: "Índice Global de Autonomia (2026)",
    pai: "Índice Projetado (2107)",
    stability: "Deriva de estabilidade",
    within: "dentro da tolerância",
    latent: "Processo de consciência: latente",
    redirect: "Redirecionamento automático para /core em",
    seconds: "segundos.",
};

static ES: AccessText = AccessText {
    header: "NUVE OS // INSTANCIA TEMPORAL",
    bio: "Instancia biológica detectada.",
    region: "Región",
    tz: "Zona horaria",
    year: "Año local confirmado",
    drift: "Desvío temporal",
    years: "años",
    cog: "Integración cognitiva",
    cog_no: "no iniciada",
    access: "Permiso de acceso",
    partial: "parcial",
    intervention: "Intervención necesaria",
    none: "ninguna",
    gai: "Índice Global de Autonomía (2026)",
    pai: "Índice Proyectado (2107)",
    stability: "Deriva de estabilidad",
    within: "dentro de la tolerancia",
    latent: "Proceso de consciencia: latente",
    redirect: "Redirección automática a /core en",
    seconds: "segundos.",
};

/// Observable change of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessSignal {
    Stage(u8),
    Countdown(u64),
    Redirect(Route),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessEvent {
    Stage(u8),
    Countdown,
    Redirect,
}

pub struct AccessScreen {
    language: Language,
    year: i32,
    zone: Zone,
    opened_at: SeqTime,
    stage: u8,
    countdown: u64,
    redirected: bool,
    timers: TimerQueue<AccessEvent>,
}

impl AccessScreen {
    pub fn open(language: Language, year: i32, zone: Zone, now: SeqTime) -> Self {
        let mut timers = TimerQueue::new();
        timers.set_at(now + STAGE_ONE_AT, TimerScope::Sequence, AccessEvent::Stage(1));
        timers.set_at(now + STAGE_TWO_AT, TimerScope::Sequence, AccessEvent::Stage(2));
        timers.set_at(now + REDIRECT_AFTER, TimerScope::Sequence, AccessEvent::Redirect);
        timers.set_interval(now, COUNTDOWN_TICK, TimerScope::Sequence, AccessEvent::Countdown);

        tracing::debug!(%language, year, zone = %zone.name, "temporal access opened");
        AccessScreen {
            language,
            year,
            zone,
            opened_at: now,
            stage: 0,
            countdown: REDIRECT_AFTER.as_secs(),
            redirected: false,
            timers,
        }
    }

    pub fn advance_to(&mut self, now: SeqTime) -> Vec<AccessSignal> {
        let mut signals = Vec::new();
        while let Some(fired) = self.timers.pop_due(now) {
            match fired.event {
                AccessEvent::Stage(stage) => {
                    self.stage = stage;
                    signals.push(AccessSignal::Stage(stage));
                }
                AccessEvent::Countdown => {
                    let elapsed = fired.due.since(self.opened_at).as_secs();
                    let remaining = REDIRECT_AFTER.as_secs().saturating_sub(elapsed);
                    if remaining != self.countdown {
                        self.countdown = remaining;
                        signals.push(AccessSignal::Countdown(remaining));
                    }
                }
                AccessEvent::Redirect => {
                    self.redirected = true;
                    self.countdown = 0;
                    self.timers.clear_all();
                    signals.push(AccessSignal::Redirect(Route::Core));
                    tracing::debug!("temporal access redirecting to {}", Route::Core);
                    break;
                }
            }
        }
        signals
    }

    /// Stop every timer without redirecting
    pub fn close(&mut self) {
        self.timers.clear_all();
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    /// Whole seconds left before the redirect
    pub fn countdown(&self) -> u64 {
        self.countdown
    }

    pub fn is_redirected(&self) -> bool {
        self.redirected
    }

    pub fn drift_years(&self) -> i32 {
        temporal_drift(self.year)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn header(&self) -> &'static str {
        AccessText::for_language(self.language).header
    }

    /// Log lines for the current stage
    pub fn lines(&self) -> Vec<String> {
        let t = AccessText::for_language(self.language);
        let mut lines = vec![
            t.bio.to_string(),
            format!("{}: {}", t.region, self.zone.region),
            format!("{}: {}", t.tz, self.zone.name),
            format!("{}: {}", t.year, self.year),
            format!("{}: {} {}", t.drift, self.drift_years(), t.years),
            format!("{}: {}", t.cog, t.cog_no),
            format!("{}: {}", t.access, t.partial),
            format!("{}: {}", t.intervention, t.none),
        ];
        if self.stage >= 1 {
            lines.push(format!("{}: 34%", t.gai));
            lines.push(format!("{}: 97.2%", t.pai));
            lines.push(format!("{}: {}", t.stability, t.within));
        }
        if self.stage >= 2 {
            lines.push(t.latent.to_string());
            lines.push(format!("{} {} {}", t.redirect, self.countdown, t.seconds));
        }
        lines
    }
}

impl Drop for AccessScreen {
    fn drop(&mut self) {
        self.close();
    }
}
