use crate::errors::CalcResult;
use crate::models::normal::normal_cdf;
use crate::models::{MarketInputs, OptionType, PricingModel, PricingResult};

/// Calendar days per year for the simple actual/365 year fraction.
const DAYS_PER_YEAR: f64 = 365.0;

/// Black-Scholes European option pricing.
///
/// d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
///
/// call = S*N(d1) - K*e^(-rT)*N(d2),   delta = N(d1)
/// put  = K*e^(-rT)*N(-d2) - S*N(-d1), delta = N(d1) - 1
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholes;

/// Precomputed model parameters (stack, no alloc).
#[derive(Debug, Clone, Copy)]
pub struct ModelParams {
    pub spot: f64,
    pub strike: f64,
    pub time_years: f64,
    pub rate: f64,
    // Precomputed
    pub ln_s_k: f64,
    pub sigma_sqrt_t: f64,
    pub half_sigma_sq: f64,
    pub discount: f64,
}

impl ModelParams {
    /// Convert percentage-point vol/rate and calendar days into model units.
    #[inline]
    pub fn from_inputs(inputs: &MarketInputs) -> Self {
        let time_years = inputs.days_to_expiration / DAYS_PER_YEAR;
        let sigma = inputs.implied_vol / 100.0;
        let rate = inputs.risk_free_rate / 100.0;
        Self {
            spot: inputs.stock_price,
            strike: inputs.strike_price,
            time_years,
            rate,
            ln_s_k: (inputs.stock_price / inputs.strike_price).ln(),
            sigma_sqrt_t: sigma * time_years.sqrt(),
            half_sigma_sq: 0.5 * sigma * sigma,
            discount: (-rate * time_years).exp(),
        }
    }

    #[inline]
    pub fn d1_d2(&self) -> (f64, f64) {
        let d1 = (self.ln_s_k + (self.rate + self.half_sigma_sq) * self.time_years)
            / self.sigma_sqrt_t;
        (d1, d1 - self.sigma_sqrt_t)
    }
}

impl PricingModel for BlackScholes {
    #[inline]
    fn name(&self) -> &'static str {
        "Black-Scholes"
    }

    fn evaluate(&self, inputs: &MarketInputs) -> CalcResult<PricingResult> {
        inputs.validate()?;

        let params = ModelParams::from_inputs(inputs);
        let (d1, d2) = params.d1_d2();
        let nd1 = normal_cdf(d1);
        let pv_strike = params.strike * params.discount;

        // Cancellation can leave a deep OTM price a few ulps below zero
        let result = match inputs.option_type {
            OptionType::Call => PricingResult {
                delta: nd1,
                price: (params.spot * nd1 - pv_strike * normal_cdf(d2)).max(0.0),
            },
            OptionType::Put => PricingResult {
                delta: nd1 - 1.0,
                price: (pv_strike * normal_cdf(-d2) - params.spot * normal_cdf(-d1)).max(0.0),
            },
        };

        tracing::trace!(
            model = self.name(),
            d1,
            d2,
            delta = result.delta,
            price = result.price,
            "option evaluated"
        );

        Ok(result)
    }
}
