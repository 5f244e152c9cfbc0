//! Text templates for dossier outcomes and story beats.

use chrono::NaiveDateTime;

use crate::dossier::{Consequence, Outlook};

const SHORT_DATE: &str = "%d/%m %H:%M";
const LONG_DATE: &str = "%d/%m/%Y, %H:%M";

pub fn consequence_text(consequence: &Consequence) -> String {
    match consequence {
        Consequence::ShieldBreachThenStorm { peak_kp } => format!(
            "The magnetic shield was struck (MPC), setting off a geomagnetic storm (GST) that peaked at Kp {:.2}.",
            peak_kp
        ),
        Consequence::StormOnly { peak_kp } => format!(
            "A geomagnetic storm (GST) took place, peaking at Kp {:.2}.",
            peak_kp
        ),
        Consequence::Minimal => "Minimal or unregistered geomagnetic impact.".to_string(),
    }
}

pub fn outlook_text(outlook: &Outlook) -> &'static str {
    match outlook {
        Outlook::ElevatedSatelliteRisk => {
            "The radiation belts were enhanced (RBE), a lasting risk for satellites."
        }
        Outlook::MinimalLongTerm => "Minimal long-term effects.",
    }
}

// Routine worker

pub fn worker_warning(at: NaiveDateTime, cause: &str) -> String {
    format!(
        "Push notification\n{} : Space weather alert. Cause: {}. GPS at risk.",
        at.format(SHORT_DATE),
        cause
    )
}

pub fn worker_impact(at: NaiveDateTime) -> String {
    format!(
        "At {}, the tractors stall in the middle of the field. \"The storm is here,\" says the field technician. \"GPS guidance is down, but we can still steer the harvest by hand.\"",
        at.format(SHORT_DATE)
    )
}

pub fn worker_outlook(at: NaiveDateTime, cause: &str, outlook: &Outlook) -> String {
    format!(
        "Later the technician explains: \"It all started with {}. From {} on, the danger is not over... ({})\"",
        cause,
        at.format(SHORT_DATE),
        outlook_text(outlook)
    )
}

// Mariner

pub fn mariner_calm(at: NaiveDateTime) -> String {
    format!(
        "THE CALM\nDate: {}. Place: the coast.\nThe fisher readies the boat, trusting the GPS. Nobody on board knows a solar storm is on its way.",
        at.format(LONG_DATE)
    )
}

pub fn mariner_danger(at: NaiveDateTime, consequence: &Consequence) -> String {
    format!(
        "DANGER AT SEA\nDate: {}. Place: open water.\nFar from shore, the GPS goes dark. A voice crackles over the radio: \"You have been caught by a geomagnetic storm! {} Your GPS will not be back soon.\"",
        at.format(LONG_DATE),
        consequence_text(consequence)
    )
}

// Sky observer

pub fn observer_forecast(at: NaiveDateTime, peak_kp: f64) -> String {
    format!(
        "THE FORECAST\nDate: {}. Place: the northern observatory.\nThe aurora guide reads the forecast, Kp {:.0}, with Bz turning south. \"Tonight will be a show,\" the guide whispers.",
        at.format(LONG_DATE),
        peak_kp
    )
}

pub fn observer_arrival(at: NaiveDateTime) -> String {
    format!(
        "THE ARRIVAL\nDate: {}.\nVisitors fill the observatory. \"The data never lies,\" the guide tells them. \"The show is about to begin.\"",
        at.format(LONG_DATE)
    )
}

pub fn observer_display(at: NaiveDateTime, cause: &str) -> String {
    format!(
        "THE DISPLAY\nDate: {}.\nUnder the aurora, the guide says: \"All of this beauty was caused by {}, an eruption 150 million kilometres away.\"",
        at.format(LONG_DATE),
        cause
    )
}
