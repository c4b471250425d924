//! # engine::signals
//!
//! Randomised indicator snapshot. Nothing here is derived from a real price
//! series; `price` is accepted so a future generator can perturb around it.

use crate::models::{
    BandPosition, BandWidth, BollingerBands, Macd, SignalStatus, TechnicalSignals,
};

use super::price::round2;
use super::rng::RandomSource;

/// Produce a fresh [`TechnicalSignals`] snapshot.
///
/// Draw order is fixed (rsi, macd signal, band position, histogram, band
/// width, sma, stochastic) so a scripted source maps one-to-one onto fields.
pub fn generate_signals(_price: f64, rng: &mut dyn RandomSource) -> TechnicalSignals {
    let rsi = rng.int_inclusive(20, 80) as u8;

    let macd_signal = if rng.next_f64() > 0.5 {
        SignalStatus::Bullish
    } else {
        SignalStatus::Bearish
    };

    let band_draw = rng.next_f64();
    let position = if band_draw > 0.7 {
        BandPosition::Upper
    } else if band_draw < 0.3 {
        BandPosition::Lower
    } else {
        BandPosition::Middle
    };

    let histogram = round2(rng.float_range(-5.0, 5.0));

    let width = if rng.next_f64() > 0.5 {
        BandWidth::Expanding
    } else {
        BandWidth::Contracting
    };

    let sma_crossover = if rng.next_f64() > 0.6 {
        SignalStatus::Bullish
    } else {
        SignalStatus::Bearish
    };

    let stochastic = rng.int_inclusive(0, 99) as u8;

    TechnicalSignals {
        rsi,
        macd: Macd {
            histogram,
            signal: macd_signal,
        },
        bollinger_bands: BollingerBands { position, width },
        sma_crossover,
        stochastic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::{ScriptedRandom, SeededRandom};

    #[test]
    fn test_ranges_hold_over_many_draws() {
        let mut rng = SeededRandom::new(1);
        for _ in 0..2_000 {
            let s = generate_signals(64_230.5, &mut rng);
            assert!((20..=80).contains(&s.rsi));
            assert!(s.stochastic <= 100);
            assert!((-5.0..=5.0).contains(&s.macd.histogram));
        }
    }

    #[test]
    fn test_scripted_draws_map_to_fields() {
        // rsi, macd, band pos, histogram, band width, sma, stochastic
        let mut rng = ScriptedRandom::new(&[0.95, 0.9, 0.1, 0.75, 0.2, 0.7, 0.5]);
        let s = generate_signals(100.0, &mut rng);

        assert_eq!(s.rsi, 77);
        assert_eq!(s.macd.signal, SignalStatus::Bullish);
        assert_eq!(s.bollinger_bands.position, BandPosition::Lower);
        assert_eq!(s.macd.histogram, 2.5);
        assert_eq!(s.bollinger_bands.width, BandWidth::Contracting);
        assert_eq!(s.sma_crossover, SignalStatus::Bullish);
        assert_eq!(s.stochastic, 50);
    }

    #[test]
    fn test_low_draws_are_bearish() {
        let mut rng = ScriptedRandom::new(&[0.0, 0.5, 0.5, 0.0, 0.5, 0.6, 0.0]);
        let s = generate_signals(100.0, &mut rng);

        assert_eq!(s.rsi, 20);
        assert_eq!(s.macd.signal, SignalStatus::Bearish);
        assert_eq!(s.bollinger_bands.position, BandPosition::Middle);
        assert_eq!(s.macd.histogram, -5.0);
        assert_eq!(s.sma_crossover, SignalStatus::Bearish);
        assert_eq!(s.stochastic, 0);
    }
}
