use std::{env, fs, io, path::Path, process};

use log::{debug, info};

use nanograd::{
    plotting,
    report::{self, ReportSection},
    scenarios::{get_scenario, list_scenarios},
    training::StepState,
};

const DEFAULT_PLOT_DIR: &str = "artifacts/plots";
const DEFAULT_REPORT_DIR: &str = "artifacts";
const EPS_DEMO_VALUES: [f64; 3] = [0.5, 0.1, 0.01];

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let bin = args.first().map(String::as_str).unwrap_or("nanograd");

    match args.get(1).map(String::as_str) {
        Some("list") => list()?,
        Some("train") => {
            let name = args.get(2).unwrap_or_else(|| usage(bin));
            train(name)?;
        }
        Some("plot") => {
            let target = args.get(2).unwrap_or_else(|| usage(bin));
            let out_dir = args.get(3).map(String::as_str).unwrap_or(DEFAULT_PLOT_DIR);
            plot(target, out_dir)?;
        }
        Some("report") => {
            let out_dir = args
                .get(2)
                .map(String::as_str)
                .unwrap_or(DEFAULT_REPORT_DIR);
            write_report(out_dir)?;
        }
        _ => usage(bin),
    }

    Ok(())
}

fn usage(bin: &str) -> ! {
    eprintln!("Usage: {bin} <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list                       print available scenarios");
    eprintln!("  train <scenario>           train a scenario and print the final parameters");
    eprintln!("  plot <scenario|all> [dir]  write fit/loss SVG charts (default: {DEFAULT_PLOT_DIR})");
    eprintln!("  report [dir]               train every scenario, write report.html and step traces");
    process::exit(2);
}

fn list() -> io::Result<()> {
    for name in list_scenarios() {
        let scenario = get_scenario(name)?;
        println!("{name:<22} {}", scenario.description);
    }
    Ok(())
}

fn train(name: &str) -> io::Result<()> {
    let mut scenario = get_scenario(name)?;
    let mut trainer = scenario.trainer();
    info!(
        "training {name}: {} samples, {} steps, lr={}",
        scenario.data.len(),
        trainer.steps(),
        trainer.lr()
    );
    let history = trainer.train_with_observer(&scenario.data, &mut scenario.params, |state| {
        debug!("step {}: loss={:.6}", state.step(), state.loss());
    })?;

    match (history.first(), history.last()) {
        (Some(first), Some(last)) => println!("loss: {first:.6} -> {last:.6}"),
        _ => println!("no steps were run"),
    }
    for (param, value) in scenario.params.iter() {
        println!("{param} = {value:.6}");
    }
    Ok(())
}

fn plot(target: &str, out_dir: &str) -> io::Result<()> {
    fs::create_dir_all(out_dir)?;

    let names = if target == "all" {
        list_scenarios()
    } else {
        vec![target]
    };
    for name in &names {
        write_scenario_charts(name, out_dir)?;
    }

    if target == "all" {
        let path = Path::new(out_dir).join("finite_difference_eps.svg");
        fs::write(&path, plotting::eps_secant_chart(&EPS_DEMO_VALUES))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn write_scenario_charts(name: &str, out_dir: &str) -> io::Result<()> {
    let mut scenario = get_scenario(name)?;
    let initial = scenario.params.clone();

    let mut trainer = scenario.trainer();
    let history = trainer.train(&scenario.data, &mut scenario.params)?;
    info!(
        "trained {name}: final loss {:.6}",
        history.last().copied().unwrap_or(0.0)
    );

    let fit = plotting::fit_chart(
        name,
        &scenario.data,
        scenario.predict,
        &initial,
        &scenario.params,
    );
    let loss = plotting::loss_chart(&format!("{name} mean loss"), &history);

    for (file, svg) in [
        (format!("{name}_fit.svg"), fit),
        (format!("{name}_loss.svg"), loss),
    ] {
        let path = Path::new(out_dir).join(file);
        fs::write(&path, svg)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn write_report(out_dir: &str) -> io::Result<()> {
    fs::create_dir_all(out_dir)?;

    let mut sections = Vec::new();
    for name in list_scenarios() {
        let mut scenario = get_scenario(name)?;
        let initial = scenario.params.clone();

        let mut trainer = scenario.trainer();
        let mut states: Vec<StepState> = Vec::with_capacity(scenario.steps);
        let history =
            trainer.train_with_observer(&scenario.data, &mut scenario.params, |state| {
                states.push(state.clone())
            })?;

        let trace = report::trace_json(&states).map_err(io::Error::other)?;
        let trace_path = Path::new(out_dir).join(format!("trace_{name}.json"));
        fs::write(&trace_path, trace)?;
        println!("wrote {}", trace_path.display());

        sections.push(ReportSection {
            title: name.to_owned(),
            description: scenario.description.to_owned(),
            fit_svg: plotting::fit_chart(
                name,
                &scenario.data,
                scenario.predict,
                &initial,
                &scenario.params,
            ),
            loss_svg: plotting::loss_chart(&format!("{name} mean loss"), &history),
            final_loss: history.last().copied(),
            final_params: scenario.params.clone(),
        });
    }

    let html = report::render_report("nanograd training report", &sections);
    let path = Path::new(out_dir).join("report.html");
    fs::write(&path, html)?;
    println!("wrote {}", path.display());
    Ok(())
}
