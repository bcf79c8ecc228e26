/// Facts about this workstation sent to the backend when pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub hostname: String,
    /// Address the backend should associate with this device. `None` when it
    /// could not be determined; the field is then omitted from the request.
    pub external_ip: Option<String>,
}

impl DeviceIdentity {
    pub fn new(hostname: impl Into<String>, external_ip: Option<String>) -> Self {
        Self {
            hostname: hostname.into(),
            external_ip,
        }
    }
}
