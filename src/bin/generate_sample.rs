use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Positive duration in whole minutes around `mean`.
    fn minutes(&mut self, mean: f64, std_dev: f64) -> Duration {
        Duration::minutes(self.gauss(mean, std_dev).max(1.0).round() as i64)
    }
}

const LINES: &[&str] = &["Línea A", "Línea B", "Línea C"];
const SUPERVISORS: &[&str] = &["Juan Pérez", "Laura Gómez", "Carlos Ruiz", "Antonio Medina"];
const STEELS: &[&str] = &["ACERO AL CARBONO", "ACERO ALEADO", "ACERO GALVANIZADO", "ACERO INOX"];
const TRANSPORTS: &[&str] = &["Camión", "Tráiler", "Tren", "Volquete"];
const SHIFTS: &[&str] = &["Mañana", "Tarde", "Noche"];
const FAILURES: &[&str] = &["Frenos", "Neumáticos", "Motor", "Carga mal sujeta", "Retraso documental"];

fn stamp(t: NaiveDateTime) -> String {
    t.format("%d/%m/%Y %H:%M").to_string()
}

/// Occasionally blank out or corrupt a cell, the way hand-kept sheets do.
fn noisy(rng: &mut SimpleRng, value: String) -> String {
    if rng.chance(0.02) {
        String::new()
    } else if rng.chance(0.01) {
        "sin registro".to_string()
    } else {
        value
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "LOGISTICA.csv";

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record([
        "Unnamed: 0_index",
        "LINEA",
        "SUPERVISOR",
        "TIPO_ACERO",
        "TRANSPORTE",
        "TURNO",
        "PATENTE",
        "SALIDA DEL PROVEEDOR",
        "LLEGADA A FÁBRICA",
        "INICIO DESCARGA",
        "FIN DESCARGA",
        "PESO NETO",
        "TEMPERATURA",
        "FALLAS",
    ])?;

    let first_day = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;

    let mut rows = 0usize;
    for day in 0..30 {
        let trucks = 8 + (rng.next_u64() % 10) as i64;
        for _ in 0..trucks {
            let salida = first_day
                + Duration::days(day)
                + Duration::minutes((rng.next_u64() % (18 * 60)) as i64);
            let llegada = salida + rng.minutes(180.0, 45.0);
            let inicio = llegada + rng.minutes(35.0, 20.0);
            let fin = inicio + rng.minutes(40.0, 12.0);

            let linea = if rng.chance(0.05) { "" } else { rng.pick(LINES) };
            let supervisor = if rng.chance(0.03) { "" } else { rng.pick(SUPERVISORS) };
            let transporte = if rng.chance(0.03) { "" } else { rng.pick(TRANSPORTS) };
            let fallas = if rng.chance(0.18) { rng.pick(FAILURES) } else { "" };
            let patente = format!("AB{:03}CD", rng.next_u64() % 1000);

            writer.write_record([
                rows.to_string(),
                linea.to_string(),
                supervisor.to_string(),
                rng.pick(STEELS).to_string(),
                transporte.to_string(),
                rng.pick(SHIFTS).to_string(),
                patente,
                noisy(&mut rng, stamp(salida)),
                noisy(&mut rng, stamp(llegada)),
                noisy(&mut rng, stamp(inicio)),
                noisy(&mut rng, stamp(fin)),
                format!("{:.0}", rng.gauss(24_000.0, 3_500.0).max(5_000.0)),
                format!("{:.1}", rng.gauss(38.0, 6.0)),
                fallas.to_string(),
            ])?;
            rows += 1;
        }
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {rows} truck movements to {output_path}");
    Ok(())
}
