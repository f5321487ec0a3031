use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use pansops_cli::{build_route, calculate_all, gnss_requests, parse_point, write_geojson, Config};
use pansops_core::{
    ApproachParameters, DistanceUnit, HoldingParameters, Point, ProcedureRequest, TurnDirection,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Build PANS-OPS protection areas", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    procedure: Procedure,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Route file: {"points": [[x, y], ...], "selection": [start, end]}
    #[arg(long, global = true)]
    route: Option<PathBuf>,

    /// Route point in projected meters, repeatable
    #[arg(
        long = "point",
        value_name = "X,Y",
        value_parser = parse_point,
        allow_hyphen_values = true,
        global = true
    )]
    points: Vec<Point>,

    /// Selected leg as start and end point indices
    #[arg(long, num_args = 2, value_names = ["START", "END"], global = true)]
    select: Option<Vec<usize>>,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory, overrides PANSOPS_OUTPUT_DIR
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Print the result instead of writing a GeoJSON file
    #[arg(long, global = true)]
    no_export: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Procedure {
    /// Holding pattern primary and secondary areas
    Holding {
        /// Indicated airspeed in knots
        #[arg(long)]
        ias: f64,
        #[arg(long)]
        altitude: f64,
        #[arg(long, default_value = "ft")]
        altitude_unit: DistanceUnit,
        /// Temperature deviation from ISA in °C
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        isa_deviation: f64,
        #[arg(long, default_value_t = 25.0)]
        bank_angle: f64,
        /// Outbound leg time in minutes
        #[arg(long, default_value_t = 1.0)]
        leg_time: f64,
        /// Turn direction: left or right
        #[arg(long, default_value = "right")]
        turn: TurnDirection,
    },
    /// NDB final approach areas
    Ndb(ApproachArgs),
    /// Conventional initial approach areas
    ConvInitial(ApproachArgs),
    /// GNSS waypoint tolerance areas, one per waypoint
    Gnss {
        /// Waypoint in projected meters, repeatable
        #[arg(
            long = "waypoint",
            value_name = "X,Y",
            value_parser = parse_point,
            allow_hyphen_values = true,
            required = true
        )]
        waypoints: Vec<Point>,
        /// Cross-track tolerance in nautical miles
        #[arg(long)]
        xtt: f64,
    },
}

#[derive(Args, Debug)]
struct ApproachArgs {
    /// Procedure altitude in feet
    #[arg(long, default_value_t = 1000.0)]
    procedure_altitude: f64,
    /// Minimum obstacle clearance
    #[arg(long, default_value_t = 300.0)]
    moc: f64,
    #[arg(long, default_value = "ft")]
    moc_unit: DistanceUnit,
}

impl From<ApproachArgs> for ApproachParameters {
    fn from(args: ApproachArgs) -> Self {
        ApproachParameters {
            procedure_altitude_ft: args.procedure_altitude,
            moc_value: args.moc,
            moc_unit: args.moc_unit,
        }
    }
}

impl Procedure {
    fn into_requests(self) -> Vec<ProcedureRequest> {
        let request = match self {
            Procedure::Holding {
                ias,
                altitude,
                altitude_unit,
                isa_deviation,
                bank_angle,
                leg_time,
                turn,
            } => ProcedureRequest::Holding(HoldingParameters {
                ias_kt: ias,
                altitude,
                altitude_unit,
                isa_deviation_c: isa_deviation,
                bank_angle_deg: bank_angle,
                leg_time_min: leg_time,
                turn,
            }),
            Procedure::Ndb(args) => ProcedureRequest::NdbApproach(args.into()),
            Procedure::ConvInitial(args) => ProcedureRequest::ConventionalInitialApproach(args.into()),
            Procedure::Gnss { waypoints, xtt } => return gnss_requests(&waypoints, xtt),
        };
        vec![request]
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let common = cli.common;

    let directive = if common.verbose { "pansops=debug" } else { "pansops=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let mut config = Config::from_env();
    if let Some(dir) = common.output_dir {
        config.output_dir = dir;
    }
    let engine = config.engine_config(common.config.as_deref())?;

    let select = common.select.map(|pair| (pair[0], pair[1]));
    let route = build_route(common.route.as_deref(), &common.points, select)?;

    let requests = cli.procedure.into_requests();
    let areas = calculate_all(&route, &requests, &engine)?;

    for area in &areas {
        for (name, value) in &area.attributes {
            println!("{:<28} {}", name, value);
        }
        for polygon in &area.areas {
            println!(
                "{:<28} {} vertices, {:.0} m²",
                format!("{} area", polygon.kind.as_str()),
                polygon.ring.vertex_count(),
                polygon.ring.area()
            );
        }
    }

    if common.no_export {
        println!("{}", serde_json::to_string_pretty(&areas)?);
        return Ok(());
    }
    let path = write_geojson(&areas, &config.output_dir)?;
    println!("Wrote {}", path.display());
    Ok(())
}
