use std::{env, fs::File, io::BufWriter, process::ExitCode};

use rand::Rng;

use mdbox::prelude::*;

/// Retry cap for random placement; a sufficiently dense configuration would
/// otherwise loop forever.
const MAX_INSERT_ATTEMPTS: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scenario {
    One,
    OneVel,
    Two,
    TwoPass1,
    TwoPass2,
    TwoPass3,
    Random,
}
impl Scenario {
    fn name(self) -> &'static str {
        match self {
            Scenario::One => "ic-one",
            Scenario::OneVel => "ic-one-vel",
            Scenario::Two => "ic-two",
            Scenario::TwoPass1 => "ic-two-pass1",
            Scenario::TwoPass2 => "ic-two-pass2",
            Scenario::TwoPass3 => "ic-two-pass3",
            Scenario::Random => "ic-random",
        }
    }
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "--ic-one" => Some(Scenario::One),
            "--ic-one-vel" => Some(Scenario::OneVel),
            "--ic-two" => Some(Scenario::Two),
            "--ic-two-pass1" => Some(Scenario::TwoPass1),
            "--ic-two-pass2" => Some(Scenario::TwoPass2),
            "--ic-two-pass3" => Some(Scenario::TwoPass3),
            "--ic-random" => Some(Scenario::Random),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Params {
    lx: f64,
    ly: f64,
    lz: f64,
    dt: f64,
    t_end: f64,
    /// Target temperature; -1 means unconstrained.
    temp: f64,
    percent_type1: f64,
    n: usize,
    ic: Scenario,
}

fn usage() {
    eprintln!(
        "Allowed options:
  --help                 Print available options.
  --Lx arg (=20)         x length (Angstroms)
  --Ly arg (=20)         y length (Angstroms)
  --Lz arg (=20)         z length (Angstroms)
  --dt arg (=0.001)      Time-step
  --T arg                Final time
  --temp arg             Temperature (Kelvin)
  --percent-type1 arg (=10) Percentage of type 1 particles
  --N arg                Number of particles for random initialization
  --ic-one               Initial condition: one stationary particle
  --ic-one-vel           Initial condition: one moving particle
  --ic-two               Initial condition: two bouncing particles
  --ic-two-pass1         Initial condition: two passing particles
  --ic-two-pass2         Initial condition: two passing particles close
  --ic-two-pass3         Initial condition: two passing particles close, heavy
  --ic-random            Initial condition: N random particles"
    );
}

fn parse_args(args: &[String]) -> std::result::Result<Params, String> {
    let mut lx = 20.0;
    let mut ly = 20.0;
    let mut lz = 20.0;
    let mut dt = 0.001;
    let mut t_end: Option<f64> = None;
    let mut temp = -1.0;
    let mut percent_type1 = 10.0;
    let mut n: Option<usize> = None;
    let mut ic: Option<Scenario> = None;

    fn value(
        iter: &mut std::slice::Iter<String>,
        name: &str,
    ) -> std::result::Result<f64, String> {
        iter.next()
            .ok_or_else(|| format!("Error: {} requires a value", name))?
            .parse::<f64>()
            .map_err(|_| format!("Error: invalid value for {}", name))
    }

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" => {
                usage();
                std::process::exit(0);
            }
            "--Lx" => lx = value(&mut iter, "--Lx")?,
            "--Ly" => ly = value(&mut iter, "--Ly")?,
            "--Lz" => lz = value(&mut iter, "--Lz")?,
            "--dt" => dt = value(&mut iter, "--dt")?,
            "--T" => t_end = Some(value(&mut iter, "--T")?),
            "--temp" => temp = value(&mut iter, "--temp")?,
            "--percent-type1" => percent_type1 = value(&mut iter, "--percent-type1")?,
            "--N" => {
                n = Some(
                    iter.next()
                        .ok_or("Error: --N requires a value")?
                        .parse::<usize>()
                        .map_err(|_| "Error: invalid value for --N")?,
                )
            }
            flag => match Scenario::from_flag(flag) {
                Some(s) => {
                    if ic.is_some() {
                        return Err(String::from(
                            "Error: You must specify exactly one initial condition (--ic)",
                        ));
                    }
                    ic = Some(s);
                }
                None => return Err(format!("Error: unknown option {}", flag)),
            },
        }
    }

    let t_end = t_end.ok_or("Error: Final time (--T) is required")?;
    let ic = ic.ok_or("Error: You must specify exactly one initial condition (--ic)")?;
    if lx <= 0.0 || ly <= 0.0 || lz <= 0.0 || dt <= 0.0 || t_end <= 0.0 {
        return Err(String::from(
            "Error: All lengths (Lx, Ly, Lz), dt, and T must be greater than 0",
        ));
    }
    if temp != -1.0 && temp <= 0.0 {
        return Err(String::from("Error: The temperature must be > 0K"));
    }
    if !(0.0..=100.0).contains(&percent_type1) {
        return Err(String::from(
            "Error: percent-type1 must be between 0 and 100",
        ));
    }
    let n = match ic {
        Scenario::Random => {
            let n = n.ok_or("Error: The argument --N is required when using --ic-random")?;
            if n == 0 {
                return Err(String::from("Error: The number of particles N must be > 0"));
            }
            n
        }
        _ => 0,
    };

    Ok(Params {
        lx,
        ly,
        lz,
        dt,
        t_end,
        temp,
        percent_type1,
        n,
        ic,
    })
}

/// Place N particles with uniform positions and velocities in [-0.5, 0.5),
/// heavy species for the leading percent-type1 fraction, retrying rejected
/// candidates up to the attempt cap.
fn random_particles(sim: &mut Simulation, params: &Params) -> Result<()> {
    let mut rng = rand::thread_rng();
    for i in 0..params.n {
        let species = if (i as f64 + 1.0) / params.n as f64 > params.percent_type1 / 100.0 {
            Species::Light
        } else {
            Species::Heavy
        };
        let mut attempts = 0;
        loop {
            let candidate = Particle::new(
                [
                    rng.gen_range(0.0..params.lx),
                    rng.gen_range(0.0..params.ly),
                    rng.gen_range(0.0..params.lz),
                ],
                [
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                ],
                species,
            );
            if sim.try_add_particle(candidate) {
                break;
            }
            attempts += 1;
            if attempts >= MAX_INSERT_ATTEMPTS {
                return Err(Error::TooDense { attempts });
            }
        }
    }
    Ok(())
}

fn build_scenario(sim: &mut Simulation, params: &Params) -> Result<()> {
    let add = |sim: &mut Simulation, r: [f64; 3], v: [f64; 3], s: Species| {
        sim.try_add_particle(Particle::new(r, v, s));
    };
    match params.ic {
        Scenario::One => add(sim, [10.0, 10.0, 10.0], [0.0, 0.0, 0.0], Species::Light),
        Scenario::OneVel => add(sim, [10.0, 10.0, 10.0], [5.0, 2.0, 1.0], Species::Light),
        Scenario::Two => {
            add(sim, [8.5, 10.0, 10.0], [0.0, 0.0, 0.0], Species::Light);
            add(sim, [11.5, 10.0, 10.0], [0.0, 0.0, 0.0], Species::Light);
        }
        Scenario::TwoPass1 => {
            add(sim, [8.5, 11.5, 10.0], [0.5, 0.0, 0.0], Species::Light);
            add(sim, [11.5, 8.5, 10.0], [-0.5, 0.0, 0.0], Species::Light);
        }
        Scenario::TwoPass2 => {
            add(sim, [8.5, 11.3, 10.0], [0.5, 0.0, 0.0], Species::Light);
            add(sim, [11.5, 8.7, 10.0], [-0.5, 0.0, 0.0], Species::Light);
        }
        Scenario::TwoPass3 => {
            add(sim, [8.5, 11.3, 10.0], [0.5, 0.0, 0.0], Species::Heavy);
            add(sim, [11.5, 8.7, 10.0], [-0.5, 0.0, 0.0], Species::Heavy);
        }
        Scenario::Random => random_particles(sim, params)?,
    }
    Ok(())
}

fn run(params: &Params) -> Result<()> {
    let mut sim = Simulation::new(Container::new(params.lx, params.ly, params.lz));
    build_scenario(&mut sim, params)?;

    let random = params.ic == Scenario::Random;
    let mut config = RunConfig::new(params.dt, params.t_end);
    config.emit_trajectory = !random;
    config.cutoff = random;
    config.parallel = random;
    if params.temp != -1.0 {
        config.thermostat = Thermostat::EveryStep {
            target: params.temp,
        };
    }

    let name = params.ic.name();
    let particles = BufWriter::new(File::create(format!("{}_particles.txt", name))?);
    let energies = BufWriter::new(File::create(format!("{}_energy.txt", name))?);
    let mut sink = TextSink::new(particles, energies);

    sim.run(&config, &mut sink)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let params = match parse_args(&args) {
        Ok(p) => p,
        Err(msg) => {
            eprintln!("{}", msg);
            usage();
            return ExitCode::FAILURE;
        }
    };
    match run(&params) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
