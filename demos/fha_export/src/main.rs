use argh::FromArgs;
use serde::Serialize;
use std::path::PathBuf;

use helica::fha::Method;
use helica::io::RateBounds;
use helica::session::{Event, Response, Session};

#[derive(FromArgs)]
/// Compute helical axes for the objects of a scene folder and export them
struct Args {
    /// path to the scene folder
    #[argh(option, short = 'd')]
    data_dir: PathBuf,

    /// one of world, reference, reference-project-first, relational
    #[argh(option, short = 'm', default = "Method::WorldRelative")]
    method: Method,

    /// name of the reference object
    #[argh(option, short = 'r')]
    reference: Option<String>,

    /// name of the target object
    #[argh(option, short = 't')]
    target: String,

    /// output folder, defaults to <data_dir>/export
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// time window as seconds from the start, e.g. 0.5
    #[argh(option)]
    window: Option<f64>,

    /// lower bound of the exported rotation rates
    #[argh(option)]
    phi_min: Option<f64>,

    /// upper bound of the exported rotation rates
    #[argh(option)]
    phi_max: Option<f64>,

    /// print the summary as json
    #[argh(switch)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    name: &'a str,
    method: Method,
    samples: usize,
    valid: usize,
    timestep_duration: f64,
    window: (f64, f64),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut session = Session::open(&args.data_dir)?;
    let find = |name: &str| {
        session
            .object_names()
            .iter()
            .position(|n| n == name)
            .map(helica::fha::ObjectId)
            .ok_or_else(|| format!("no object named '{name}' in {}", args.data_dir.display()))
    };
    let target = find(&args.target)?;
    let reference = args.reference.as_deref().map(find).transpose()?;

    // drive the session the way a viewer would
    session.handle(Event::Activate(args.method))?;
    if let Some(reference) = reference.filter(|_| args.method.needs_reference()) {
        session.handle(Event::Pick(Some(reference)))?;
    }
    let Response::AxisSetCreated(id) = session.handle(Event::Pick(Some(target)))? else {
        return Err(format!("{} needs a reference object", args.method).into());
    };

    if let Some(width) = args.window {
        let start = session.time().t_min();
        session.handle(Event::SetRange {
            lower: start,
            upper: start + width,
        })?;
    }

    if let Some(set) = session.axis_set(id) {
        let summary = Summary {
            name: &set.name,
            method: set.method,
            samples: set.len(),
            valid: set.valid_count(),
            timestep_duration: set.timestep_duration,
            window: (session.time().t_lower(), session.time().t_upper()),
        };
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "{}: {} samples, {} valid, {:.4} s per step",
                summary.name, summary.samples, summary.valid, summary.timestep_duration
            );
        }
    }

    let bounds = (args.phi_min.is_some() || args.phi_max.is_some()).then(|| RateBounds {
        phi_min: args.phi_min.unwrap_or(f64::NEG_INFINITY),
        phi_max: args.phi_max.unwrap_or(f64::INFINITY),
        l_min: f64::NEG_INFINITY,
        l_max: f64::INFINITY,
    });

    let output = args.output.unwrap_or_else(|| args.data_dir.join("export"));
    for summary in session.export_visible(&output, args.window.is_some(), bounds)? {
        log::info!("wrote {} rows", summary.rows);
        for file in summary.files {
            println!("  {}", file.display());
        }
    }

    Ok(())
}
