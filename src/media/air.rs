use once_cell::sync::Lazy;

/// Standard air at 20°C, the saturating fluid of every porous model.
#[derive(Clone, Debug)]
pub struct Air {
    /// reference temperature [K]
    pub t: f64,
    /// atmospheric pressure [Pa]
    pub p: f64,
    /// polytropic coefficient
    pub gamma: f64,
    /// thermal conductivity [W.m^-1.K^-1]
    pub lambda: f64,
    /// dynamic viscosity [kg.m^-1.s^-1]
    pub mu: f64,
    /// Prandtl's number
    pub pr: f64,
    /// molar mass [kg.mol^-1]
    pub molar_mass: f64,
    /// density [kg.m^-3]
    pub rho: f64,
    /// specific heat capacity at constant pressure [J.K^-1]
    pub c_p: f64,
    /// adiabatic bulk modulus
    pub k: f64,
    /// adiabatic sound speed
    pub c: f64,
    /// characteristic impedance
    pub z: f64,
    /// specific heat capacity at constant volume [J.K^-1]
    pub c_v: f64,
    /// kinematic viscosity
    pub nu: f64,
    /// viscothermal losses
    pub nu_prime: f64,
}
impl Air {
    fn standard() -> Self {
        let gamma: f64 = 1.400;
        let p: f64 = 1.01325e5;
        let mu: f64 = 0.1839e-4;
        let pr: f64 = 0.710;
        let rho: f64 = 1.213;
        let c_p: f64 = 1006.0;
        let k = gamma * p;
        let c = (k / rho).sqrt();
        let nu = mu / rho;
        Self {
            t: 293.15,
            p,
            gamma,
            lambda: 0.0262,
            mu,
            pr,
            molar_mass: 0.29e-1,
            rho,
            c_p,
            k,
            c,
            z: rho * c,
            c_v: c_p / gamma,
            nu,
            nu_prime: nu / pr,
        }
    }
}

pub static AIR: Lazy<Air> = Lazy::new(Air::standard);
