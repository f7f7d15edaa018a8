//! Weather subsystem: tomorrow becomes today and a new forecast is rolled.
//! Runs last so the day's summary records the weather it was played in.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    state::GameState,
    subsystem::SimSubsystem,
    types::{Day, Weather},
};

pub struct WeatherSubsystem;

impl WeatherSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WeatherSubsystem {
    fn default() -> Self { Self::new() }
}

/// Uniform pick over the four weather kinds.
pub fn roll_forecast(rng: &mut dyn RandomSource) -> Weather {
    Weather::ALL[rng.pick_index(Weather::ALL.len())]
}

impl SimSubsystem for WeatherSubsystem {
    fn name(&self) -> &'static str { "weather" }

    fn update(
        &mut self,
        day: Day,
        state: &mut GameState,
        _events_in: &[SimEvent],
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        state.weather = state.next_weather;
        state.next_weather = roll_forecast(rng);

        log::debug!(
            "day={day} weather: tomorrow={} forecast={}",
            state.weather.name(),
            state.next_weather.name()
        );

        Ok(vec![SimEvent::WeatherForecast {
            day,
            weather: state.weather,
            next_weather: state.next_weather,
        }])
    }
}
