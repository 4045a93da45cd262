use tracing::{debug, info, warn};

use doctor_cell::Doctor;
use hospital_cell::Hospital;
use shared_models::{find_by_identifier, HasEntityIds};

/// Emergency context read from the invocation query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmergencyParams {
    pub emergency: bool,
    pub hospital: Option<String>,
    pub doctor: Option<String>,
}

impl EmergencyParams {
    pub fn new(emergency: bool, hospital: Option<&str>, doctor: Option<&str>) -> Self {
        Self {
            emergency,
            hospital: non_blank(hospital),
            doctor: non_blank(doctor),
        }
    }

    /// Parses `emergency=true&hospital=H&doctor=D`, with or without a leading `?`.
    ///
    /// Unknown keys are ignored and undecodable values count as absent.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();

        for pair in query.trim().trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let Some(value) = decode_component(raw) else {
                warn!("Ignoring undecodable value for query parameter '{}'", key);
                continue;
            };

            match key {
                "emergency" => params.emergency = is_truthy(&value),
                "hospital" => params.hospital = non_blank(Some(&value)),
                "doctor" => params.doctor = non_blank(Some(&value)),
                _ => debug!("Ignoring query parameter '{}'", key),
            }
        }

        params
    }

    /// Emergency shortcuts only run with the flag set and a hospital to aim at.
    pub fn is_active(&self) -> bool {
        self.emergency && self.hospital.is_some()
    }
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|value| value.into_owned())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// One-shot hospital and doctor auto-selection for emergency bookings.
///
/// Each shortcut fires at most once per wizard instance. A miss leaves the flag
/// unset so a later list can still match. Callers only ask while the wizard is on
/// the step the shortcut belongs to.
#[derive(Debug, Clone, Default)]
pub struct EmergencyPreselection {
    params: EmergencyParams,
    hospital_applied: bool,
    doctor_applied: bool,
}

impl EmergencyPreselection {
    pub fn new(params: EmergencyParams) -> Self {
        if params.emergency && params.hospital.is_none() {
            warn!("Emergency booking requested without a hospital, using the manual flow");
        }
        if params.doctor.is_some() && params.hospital.is_none() {
            debug!("Doctor identifier ignored without a hospital identifier");
        }

        Self {
            params,
            hospital_applied: false,
            doctor_applied: false,
        }
    }

    pub fn params(&self) -> &EmergencyParams {
        &self.params
    }

    pub fn is_emergency(&self) -> bool {
        self.params.emergency
    }

    /// Hospital to auto-select from a freshly loaded list.
    pub fn hospital_to_select<'a>(
        &mut self,
        hospitals: &'a [Hospital],
    ) -> Option<&'a Hospital> {
        if !self.params.is_active() || self.hospital_applied {
            return None;
        }
        let wanted = self.params.hospital.as_deref()?;

        match find_by_identifier(hospitals, wanted) {
            Some(hospital) => {
                info!("Emergency hospital {} matched {}", wanted, hospital.hospital_name);
                self.hospital_applied = true;
                Some(hospital)
            }
            None => {
                info!("Emergency hospital {} not found, falling back to manual selection", wanted);
                None
            }
        }
    }

    /// Doctor to auto-select once `hospital`'s doctor list has loaded: the requested
    /// doctor when one was given, otherwise the first doctor listed.
    pub fn doctor_to_select<'a>(
        &mut self,
        hospital: &Hospital,
        doctors: &'a [Doctor],
    ) -> Option<&'a Doctor> {
        if !self.hospital_applied || self.doctor_applied {
            return None;
        }
        let wanted_hospital = self.params.hospital.as_deref()?;
        if !hospital.matches_identifier(wanted_hospital) {
            return None;
        }

        let doctor = match self.params.doctor.as_deref() {
            Some(wanted) => {
                let found = find_by_identifier(doctors, wanted);
                if found.is_none() {
                    info!("Emergency doctor {} not found, falling back to manual selection", wanted);
                }
                found
            }
            None => doctors.first(),
        }?;

        info!("Emergency doctor auto-selected: {}", doctor.display_name());
        self.doctor_applied = true;
        Some(doctor)
    }
}
