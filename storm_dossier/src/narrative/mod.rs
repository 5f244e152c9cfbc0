//! Narrative renderer.
//!
//! A pure function of a dossier and its closure. Each persona needs certain
//! anchor events in the closure; beat times are fixed offsets from the anchor
//! timestamps, which are read from the anchor ids. When an anchor is missing
//! the renderer reports [`NarrativeOutcome::InsufficientData`] instead of
//! guessing a time.

pub mod templates;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use space_weather::{Category, EventType};

use crate::config::NarrativeConfig;
use crate::dossier::Dossier;
use crate::linkage::LinkageClosure;

/// Who the story is told through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// A farm worker whose GPS-guided machinery stops.
    RoutineWorker,
    /// A fisher who loses navigation at sea.
    Mariner,
    /// An aurora guide waiting for the display.
    SkyObserver,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::RoutineWorker, Persona::Mariner, Persona::SkyObserver];

    pub fn name(&self) -> &'static str {
        match self {
            Persona::RoutineWorker => "routine-worker",
            Persona::Mariner => "mariner",
            Persona::SkyObserver => "sky-observer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One timed fragment of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeBeat {
    pub key: String,
    pub at: NaiveDateTime,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storyline {
    pub persona: Persona,
    pub beats: Vec<NarrativeBeat>,
}

impl Storyline {
    /// All beats joined by blank lines.
    pub fn to_text(&self) -> String {
        self.beats
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NarrativeOutcome {
    Rendered(Storyline),
    /// A required anchor event is absent from the closure. `missing` lists
    /// the acceptable types for that anchor.
    InsufficientData {
        persona: Persona,
        missing: Vec<EventType>,
    },
}

impl NarrativeOutcome {
    pub fn storyline(&self) -> Option<&Storyline> {
        match self {
            NarrativeOutcome::Rendered(storyline) => Some(storyline),
            NarrativeOutcome::InsufficientData { .. } => None,
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.storyline().is_some()
    }
}

/// Renders storylines from dossiers.
#[derive(Debug, Clone, Default)]
pub struct NarrativeRenderer {
    config: NarrativeConfig,
}

impl NarrativeRenderer {
    pub fn new(config: NarrativeConfig) -> Self {
        Self { config }
    }

    pub fn render(
        &self,
        persona: Persona,
        dossier: &Dossier,
        closure: &LinkageClosure,
    ) -> NarrativeOutcome {
        let rendered = match persona {
            Persona::RoutineWorker => self.render_worker(dossier, closure),
            Persona::Mariner => self.render_mariner(dossier, closure),
            Persona::SkyObserver => self.render_observer(dossier, closure),
        };

        match rendered {
            Ok(beats) => NarrativeOutcome::Rendered(Storyline { persona, beats }),
            Err(missing) => NarrativeOutcome::InsufficientData { persona, missing },
        }
    }

    /// Render every persona, in persona order.
    pub fn render_all(
        &self,
        dossier: &Dossier,
        closure: &LinkageClosure,
    ) -> Vec<(Persona, NarrativeOutcome)> {
        Persona::ALL
            .into_iter()
            .map(|p| (p, self.render(p, dossier, closure)))
            .collect()
    }

    fn render_worker(
        &self,
        dossier: &Dossier,
        closure: &LinkageClosure,
    ) -> Result<Vec<NarrativeBeat>, Vec<EventType>> {
        let cause_at = cause_anchor(closure).ok_or_else(|| vec![EventType::Cme, EventType::Flr])?;
        let impact_at = anchor(closure, EventType::Mpc)?;
        let storm_at = anchor(closure, EventType::Gst)?;
        let cause = dossier.dominant_cause.label();

        let warning_at = cause_at - hours(self.config.warning_lead_hours);
        let outlook_at = storm_at + hours(self.config.outlook_delay_hours);

        Ok(vec![
            beat("act_1_warning", warning_at, templates::worker_warning(warning_at, &cause)),
            beat("act_2_impact", impact_at, templates::worker_impact(impact_at)),
            beat(
                "act_3_explanation",
                outlook_at,
                templates::worker_outlook(outlook_at, &cause, &dossier.outlook),
            ),
        ])
    }

    fn render_mariner(
        &self,
        dossier: &Dossier,
        closure: &LinkageClosure,
    ) -> Result<Vec<NarrativeBeat>, Vec<EventType>> {
        let storm_at = anchor(closure, EventType::Gst)?;
        let calm_at = storm_at - hours(self.config.calm_lead_hours);

        Ok(vec![
            beat("scene_1_calm", calm_at, templates::mariner_calm(calm_at)),
            beat(
                "scene_2_danger",
                storm_at,
                templates::mariner_danger(storm_at, &dossier.consequence),
            ),
        ])
    }

    fn render_observer(
        &self,
        dossier: &Dossier,
        closure: &LinkageClosure,
    ) -> Result<Vec<NarrativeBeat>, Vec<EventType>> {
        let storm_at = anchor(closure, EventType::Gst)?;
        let forecast_at = storm_at - hours(self.config.forecast_lead_hours);
        let display_at = storm_at + hours(self.config.display_delay_hours);
        let cause = dossier.dominant_cause.label();

        Ok(vec![
            beat(
                "scene_1_forecast",
                forecast_at,
                templates::observer_forecast(forecast_at, dossier.peak_kp),
            ),
            beat("scene_2_arrival", storm_at, templates::observer_arrival(storm_at)),
            beat(
                "scene_3_display",
                display_at,
                templates::observer_display(display_at, &cause),
            ),
        ])
    }
}

/// Render a dossier as a plain-text report.
pub fn render_summary(dossier: &Dossier) -> String {
    let mut report = String::new();

    report.push_str("## Dominant Cause\n");
    report.push_str(&dossier.dominant_cause.label());
    report.push_str("\n\n");

    report.push_str("## Events by Phase\n");
    for category in Category::ALL {
        let bucket = dossier.bucket(category);
        report.push_str(&format!(
            "{}: {}\n",
            category,
            if bucket.is_empty() {
                "None".to_string()
            } else {
                bucket.join(", ")
            }
        ));
    }
    report.push('\n');

    report.push_str("## Consequence at Earth\n");
    report.push_str(&templates::consequence_text(&dossier.consequence));
    report.push_str("\n\n");

    report.push_str("## Outlook\n");
    report.push_str(templates::outlook_text(&dossier.outlook));
    report.push('\n');

    report
}

fn hours(count: i64) -> Duration {
    Duration::hours(count)
}

fn beat(key: &str, at: NaiveDateTime, text: String) -> NarrativeBeat {
    NarrativeBeat {
        key: key.to_string(),
        at,
        text,
    }
}

fn anchor(closure: &LinkageClosure, event_type: EventType) -> Result<NaiveDateTime, Vec<EventType>> {
    closure
        .first_of_type(event_type)
        .and_then(|entry| entry.timestamp())
        .ok_or_else(|| vec![event_type])
}

/// A CME anchors the warning when present, otherwise a flare.
fn cause_anchor(closure: &LinkageClosure) -> Option<NaiveDateTime> {
    [EventType::Cme, EventType::Flr]
        .into_iter()
        .find_map(|t| closure.first_of_type(t).and_then(|entry| entry.timestamp()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dossier::classify;
    use space_weather::{Event, EventId, KpReading};

    const GST: &str = "2024-05-10T15:00:00-GST-001";
    const CME: &str = "2024-05-08T05:36:00-CME-001";
    const MPC: &str = "2024-05-10T16:36:00-MPC-001";
    const RBE: &str = "2024-05-11T12:00:00-RBE-001";

    fn closure(ids: &[&str]) -> LinkageClosure {
        LinkageClosure::from_ids(ids.iter().map(|id| EventId::new(*id)))
    }

    fn storm() -> Event {
        Event::from_id(GST).unwrap().with_reading(KpReading::new(8.67))
    }

    #[test]
    fn test_worker_storyline() {
        let closure = closure(&[GST, CME, MPC, RBE]);
        let dossier = classify(&closure, &storm());
        let outcome = NarrativeRenderer::default().render(Persona::RoutineWorker, &dossier, &closure);

        let storyline = outcome.storyline().unwrap();
        assert_eq!(storyline.beats.len(), 3);
        assert!(storyline.beats[0].text.contains("08/05 05:36"));
        assert!(storyline.beats[0].text.contains("1x CME (Coronal Mass Ejection)"));
        assert!(storyline.beats[1].text.contains("10/05 16:36"));
        // 24 hours after the storm
        assert!(storyline.beats[2].text.contains("11/05 15:00"));
        assert!(storyline.beats[2].text.contains("radiation belts"));
    }

    #[test]
    fn test_worker_falls_back_to_flare() {
        let flare = "2024-05-08T04:37:00-FLR-001";
        let closure = closure(&[GST, flare, MPC]);
        let dossier = classify(&closure, &storm());
        let outcome = NarrativeRenderer::default().render(Persona::RoutineWorker, &dossier, &closure);
        assert!(outcome.storyline().unwrap().beats[0].text.contains("08/05 04:37"));
    }

    #[test]
    fn test_worker_needs_cause_anchor() {
        let closure = closure(&[GST, MPC]);
        let dossier = classify(&closure, &storm());
        let outcome = NarrativeRenderer::default().render(Persona::RoutineWorker, &dossier, &closure);
        assert_eq!(
            outcome,
            NarrativeOutcome::InsufficientData {
                persona: Persona::RoutineWorker,
                missing: vec![EventType::Cme, EventType::Flr],
            }
        );
    }

    #[test]
    fn test_mariner_and_observer_need_storm() {
        let closure = closure(&[CME]);
        let dossier = classify(&closure, &storm());
        let renderer = NarrativeRenderer::default();

        for persona in [Persona::Mariner, Persona::SkyObserver] {
            assert_eq!(
                renderer.render(persona, &dossier, &closure),
                NarrativeOutcome::InsufficientData {
                    persona,
                    missing: vec![EventType::Gst],
                }
            );
        }
    }

    #[test]
    fn test_mariner_offsets() {
        let closure = closure(&[GST, MPC]);
        let dossier = classify(&closure, &storm());
        let outcome = NarrativeRenderer::default().render(Persona::Mariner, &dossier, &closure);

        let beats = &outcome.storyline().unwrap().beats;
        assert!(beats[0].text.contains("10/05/2024, 09:00"));
        assert!(beats[1].text.contains("The magnetic shield was struck"));
        assert!(beats[1].text.contains("Kp 8.67"));
    }

    #[test]
    fn test_custom_offsets() {
        let closure = closure(&[GST]);
        let dossier = classify(&closure, &storm());
        let renderer = NarrativeRenderer::new(NarrativeConfig {
            forecast_lead_hours: 5,
            ..NarrativeConfig::default()
        });
        let outcome = renderer.render(Persona::SkyObserver, &dossier, &closure);
        let beats = &outcome.storyline().unwrap().beats;
        assert!(beats[0].text.contains("10/05/2024, 10:00"));
        assert!(beats[0].text.contains("Kp 9"));
        assert!(beats[2].text.contains("undetermined"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let closure = closure(&[GST, CME, MPC, RBE]);
        let dossier = classify(&closure, &storm());
        let renderer = NarrativeRenderer::default();

        for persona in Persona::ALL {
            let first = renderer.render(persona, &dossier, &closure);
            let second = renderer.render(persona, &dossier, &closure);
            assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }

    #[test]
    fn test_summary() {
        let closure = closure(&[GST, CME, MPC]);
        let dossier = classify(&closure, &storm());
        let summary = render_summary(&dossier);

        assert!(summary.contains("## Dominant Cause\n1x CME (Coronal Mass Ejection)"));
        assert!(summary.contains("Transit: None"));
        assert!(summary.contains("Impact: 1x GST (Geomagnetic Storm), 1x MPC (Magnetopause Crossing)"));
        assert!(summary.contains("Minimal long-term effects."));
    }

    #[test]
    fn test_persona_names() {
        for persona in Persona::ALL {
            assert_eq!(Persona::from_name(persona.name()), Some(persona));
        }
        assert_eq!(Persona::from_name("astronaut"), None);
    }
}
