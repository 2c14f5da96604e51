use chrono::{DateTime, TimeZone, Utc};

pub trait TimeProvider {
    fn get_utc_time(&self) -> DateTime<Utc>;

    fn get_time_in<Tz: TimeZone>(&self, zone: &Tz) -> DateTime<Tz> {
        self.get_utc_time().with_timezone(zone)
    }
}

#[derive(Default)]
pub struct RealTimeProvider {}

impl TimeProvider for RealTimeProvider {
    fn get_utc_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
#[derive(Debug)]
pub struct DummyTimeProvider {
    utc_time: DateTime<Utc>,
}

#[cfg(test)]
impl DummyTimeProvider {
    pub fn new(utc_time: DateTime<Utc>) -> Self {
        Self { utc_time }
    }

    /// Change the time returned by this dummy time provider.
    pub fn set(&mut self, utc_time: DateTime<Utc>) {
        self.utc_time = utc_time;
    }
}

#[cfg(test)]
impl TimeProvider for DummyTimeProvider {
    fn get_utc_time(&self) -> DateTime<Utc> {
        self.utc_time
    }
}
