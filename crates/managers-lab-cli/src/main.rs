use clap::{Args, Parser, Subcommand, ValueEnum};
use managers_lab_solver::Solver;
use managers_lab_tools::{
    break_even::{BreakEvenInput, break_even_shift},
    complementary::{Complement, ComplementaryInput, complementary_analysis},
    discount_npv::{DiscountNpvInput, discount_npv},
    inventory::{InventoryItem, TurnoverBasis, turnover_report},
    io::RawRequest,
    loan_leasing::{LoanLeaseInput, PaymentTiming, loan_vs_leasing},
    loss_threshold::{LossThresholdInput, sales_loss_threshold},
    optimize_with,
    substitutes::{SubstitutesInput, SubstitutionScenario, default_scenarios, substitutes_sensitivity},
    supplier_credit::{SupplierCreditInput, supplier_credit},
    unit_cost::{UnitCostInput, unit_costs},
    validate::{ValidationError, parse_number},
};
use std::{
    fs::File,
    io::{BufReader, Read, stdin},
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

mod report;

#[derive(Parser)]
#[command(name = "mlab")]
#[command(version, about = "Financial what-if calculators and product mix optimizer", long_about = None)]
struct Cli {
    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the product mix that maximizes contribution margin
    Mix {
        /// Request JSON file (defaults to stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Stop the simplex after this many pivots
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Stop the simplex after this many milliseconds
        #[arg(long)]
        time_limit_ms: Option<u64>,
    },

    /// Shift in break-even volume after a price, cost or investment change
    BreakEven(BreakEvenArgs),

    /// Volume needed to keep margin after a price cut, counting complements
    Complementary(ComplementaryArgs),

    /// NPV of offering customers an early payment discount
    DiscountNpv(DiscountNpvArgs),

    /// Compare financing a property by loan or by lease
    LoanLease(LoanLeaseArgs),

    /// Inventory turnover in days for one or more products
    Turnover {
        /// Measure inventory in units or in value (against COGS)
        #[arg(short, long, value_enum, default_value = "quantity")]
        basis: Basis,

        /// Products as `name:average:outflow`
        #[arg(required = true, value_parser = inventory_item)]
        items: Vec<InventoryItem>,
    },

    /// Sales increase a price cut needs when substitutes compete
    Substitutes(SubstitutesArgs),

    /// Take the supplier's early payment discount or use the credit terms
    SupplierCredit(SupplierCreditArgs),

    /// Average unit cost over regular and overtime production
    UnitCost(UnitCostArgs),

    /// Sales loss tolerated before matching a competitor's price cut
    LossThreshold(LossThresholdArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum Basis {
    Quantity,
    Value,
}

impl From<Basis> for TurnoverBasis {
    fn from(basis: Basis) -> Self {
        match basis {
            Basis::Quantity => TurnoverBasis::Quantity,
            Basis::Value => TurnoverBasis::Value,
        }
    }
}

#[derive(Args)]
struct BreakEvenArgs {
    #[arg(long, value_parser = amount, default_value = "10.50")]
    old_price: f64,
    #[arg(long, value_parser = amount, default_value = "11.00")]
    new_price: f64,
    #[arg(long, value_parser = amount, default_value = "6.00")]
    old_cost: f64,
    #[arg(long, value_parser = amount, default_value = "6.50")]
    new_cost: f64,
    /// Investment or extra fixed costs
    #[arg(long, value_parser = amount, default_value = "0")]
    investment: f64,
    /// Units sold last period
    #[arg(long, value_parser = amount, default_value = "500")]
    units_sold: f64,
}

#[derive(Args)]
struct ComplementaryArgs {
    #[arg(long, value_parser = amount)]
    price: f64,
    #[arg(long, value_parser = amount)]
    unit_cost: f64,
    /// Price cut as a fraction of the current price
    #[arg(long, value_parser = amount)]
    price_cut: f64,
    /// Complements as `name:price:cost:attach_rate` (repeatable)
    #[arg(short, long = "complement", value_parser = complement)]
    complements: Vec<Complement>,
}

#[derive(Args)]
struct DiscountNpvArgs {
    #[arg(long, value_parser = amount, default_value = "1000")]
    current_sales: f64,
    #[arg(long, value_parser = amount, default_value = "250")]
    extra_sales: f64,
    /// Proposed discount (fraction)
    #[arg(long, value_parser = amount, default_value = "0.02")]
    discount: f64,
    /// Share of customers taking the discount (fraction)
    #[arg(long, value_parser = amount, default_value = "0.40")]
    share_taking_discount: f64,
    #[arg(long, value_parser = amount, default_value = "60")]
    days_taking_discount: f64,
    #[arg(long, value_parser = amount, default_value = "120")]
    days_not_taking_discount: f64,
    #[arg(long, value_parser = amount, default_value = "10")]
    new_days_taking_discount: f64,
    #[arg(long, value_parser = amount, default_value = "800")]
    cogs: f64,
    /// Annual cost of capital (fraction)
    #[arg(long, value_parser = amount, default_value = "0.20")]
    wacc: f64,
    #[arg(long, value_parser = amount, default_value = "30")]
    supplier_payment_days: f64,
}

#[derive(Args)]
struct LoanLeaseArgs {
    #[arg(long, value_parser = amount, default_value = "0.06")]
    loan_rate: f64,
    #[arg(long, value_parser = amount, default_value = "0.08")]
    working_capital_rate: f64,
    #[arg(long, value_parser = amount, default_value = "15")]
    years: f64,
    #[arg(long, value_parser = amount, default_value = "0.35")]
    tax_rate: f64,
    /// Installments fall due at the start of each month
    #[arg(long)]
    pay_in_advance: bool,
    #[arg(long, value_parser = amount, default_value = "250000")]
    property_value: f64,
    #[arg(long, value_parser = amount, default_value = "0.70")]
    loan_share: f64,
    #[arg(long, value_parser = amount, default_value = "1.0")]
    lease_share: f64,
    #[arg(long, value_parser = amount, default_value = "35000")]
    loan_extra_costs: f64,
    #[arg(long, value_parser = amount, default_value = "30000")]
    lease_extra_costs: f64,
    #[arg(long, value_parser = amount, default_value = "3530")]
    residual_value: f64,
    #[arg(long, value_parser = amount, default_value = "30")]
    depreciation_years: f64,
}

#[derive(Args)]
struct SubstitutesArgs {
    /// Price reduction (fraction)
    #[arg(long, value_parser = amount, default_value = "0.05")]
    price_reduction: f64,
    /// Contribution margin (fraction)
    #[arg(long, value_parser = amount, default_value = "0.40")]
    margin: f64,
    /// Largest sales increase (%) the market can absorb
    #[arg(long, value_parser = amount, default_value = "150")]
    market_capacity: f64,
    /// Scenarios as `name:factor` (repeatable, replaces the defaults)
    #[arg(short, long = "scenario", value_parser = scenario)]
    scenarios: Vec<SubstitutionScenario>,
}

#[derive(Args)]
struct SupplierCreditArgs {
    #[arg(long, value_parser = amount, default_value = "60")]
    credit_days: f64,
    /// Early payment discount (fraction)
    #[arg(long, value_parser = amount, default_value = "0.02")]
    discount: f64,
    /// Share of sales paid in cash (fraction)
    #[arg(long, value_parser = amount, default_value = "0.50")]
    cash_share: f64,
    #[arg(long, value_parser = amount, default_value = "2,000,000")]
    current_sales: f64,
    #[arg(long, value_parser = amount, default_value = "20")]
    unit_price: f64,
    #[arg(long, value_parser = amount, default_value = "18")]
    unit_cost: f64,
    /// Annual cost of capital (fraction)
    #[arg(long, value_parser = amount, default_value = "0.10")]
    interest_rate: f64,
}

#[derive(Args)]
struct UnitCostArgs {
    #[arg(long, value_parser = amount)]
    regular_units: f64,
    #[arg(long, value_parser = amount, default_value = "0")]
    overtime_units: f64,
    #[arg(long, value_parser = amount, default_value = "0")]
    raw_material_cost: f64,
    #[arg(long, value_parser = amount, default_value = "0")]
    operating_cost_regular: f64,
    #[arg(long, value_parser = amount, default_value = "0")]
    operating_cost_overtime: f64,
    #[arg(long, value_parser = amount, default_value = "0")]
    labor_cost_regular: f64,
    #[arg(long, value_parser = amount, default_value = "0")]
    labor_cost_overtime: f64,
}

#[derive(Args)]
struct LossThresholdArgs {
    #[arg(long, value_parser = amount, default_value = "8.0")]
    competitor_old_price: f64,
    #[arg(long, value_parser = amount, default_value = "7.2")]
    competitor_new_price: f64,
    #[arg(long, value_parser = amount, default_value = "8.0")]
    our_price: f64,
    #[arg(long, value_parser = amount, default_value = "4.5")]
    unit_cost: f64,
}

fn amount(text: &str) -> Result<f64, ValidationError> {
    parse_number("value", text)
}

fn split_fields<const N: usize>(text: &str, shape: &str) -> Result<[String; N], ValidationError> {
    let fields: Vec<String> = text.split(':').map(|s| s.trim().to_string()).collect();
    fields
        .try_into()
        .map_err(|_| ValidationError::MissingField(format!("{} in {:?}", shape, text)))
}

fn complement(text: &str) -> Result<Complement, ValidationError> {
    let [name, price, cost, attach_rate] = split_fields(text, "name:price:cost:attach_rate")?;
    Ok(Complement {
        price: parse_number("complement price", &price)?,
        cost: parse_number("complement cost", &cost)?,
        attach_rate: parse_number("attach rate", &attach_rate)?,
        name,
    })
}

fn scenario(text: &str) -> Result<SubstitutionScenario, ValidationError> {
    let [name, factor] = split_fields(text, "name:factor")?;
    Ok(SubstitutionScenario::new(name, parse_number("factor", &factor)?))
}

fn inventory_item(text: &str) -> Result<InventoryItem, ValidationError> {
    let [name, average, flow] = split_fields(text, "name:average:outflow")?;
    Ok(InventoryItem {
        average: parse_number("average inventory", &average)?,
        flow: parse_number("outflow", &flow)?,
        name,
    })
}

fn read_request(input: Option<&PathBuf>) -> anyhow::Result<RawRequest> {
    let reader: Box<dyn Read> = match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(stdin().lock()),
    };
    Ok(serde_json::from_reader(reader)?)
}

fn main() -> anyhow::Result<ExitCode> {
    // Events go to stderr, filtered by RUST_LOG
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match cli.command {
        Commands::Mix {
            input,
            max_iterations,
            time_limit_ms,
        } => {
            let request = read_request(input.as_ref())?.prepare()?;
            debug!(products = request.products.len(), "read product mix request");

            let mut solver = Solver::new();
            if let Some(max) = max_iterations {
                solver = solver.with_max_iterations(max);
            }
            if let Some(ms) = time_limit_ms {
                solver = solver.with_time_limit(Duration::from_millis(ms));
            }

            let result = optimize_with(&solver, &request)?;
            if json {
                report::json(&result)?;
            } else {
                report::mix(&result);
            }
            if !result.status.is_optimal() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::BreakEven(args) => {
            let shift = break_even_shift(&BreakEvenInput {
                old_price: args.old_price,
                new_price: args.new_price,
                old_cost: args.old_cost,
                new_cost: args.new_cost,
                investment: args.investment,
                units_sold: args.units_sold,
            })?;
            if json {
                report::json(&shift)?;
            } else {
                report::break_even(&shift);
            }
        }
        Commands::Complementary(args) => {
            let analysis = complementary_analysis(&ComplementaryInput {
                price: args.price,
                unit_cost: args.unit_cost,
                price_cut: args.price_cut,
                complements: args.complements,
            })?;
            if json {
                report::json(&analysis)?;
            } else {
                report::complementary(&analysis);
            }
        }
        Commands::DiscountNpv(args) => {
            let npv = discount_npv(&DiscountNpvInput {
                current_sales: args.current_sales,
                extra_sales: args.extra_sales,
                discount: args.discount,
                share_taking_discount: args.share_taking_discount,
                days_taking_discount: args.days_taking_discount,
                days_not_taking_discount: args.days_not_taking_discount,
                new_days_taking_discount: args.new_days_taking_discount,
                cogs: args.cogs,
                wacc: args.wacc,
                supplier_payment_days: args.supplier_payment_days,
            })?;
            if json {
                report::json(&npv)?;
            } else {
                report::discount_npv(&npv);
            }
        }
        Commands::LoanLease(args) => {
            let comparison = loan_vs_leasing(&LoanLeaseInput {
                loan_rate: args.loan_rate,
                working_capital_rate: args.working_capital_rate,
                years: args.years,
                tax_rate: args.tax_rate,
                timing: if args.pay_in_advance {
                    PaymentTiming::BeginningOfPeriod
                } else {
                    PaymentTiming::EndOfPeriod
                },
                property_value: args.property_value,
                loan_share: args.loan_share,
                lease_share: args.lease_share,
                loan_extra_costs: args.loan_extra_costs,
                lease_extra_costs: args.lease_extra_costs,
                residual_value: args.residual_value,
                depreciation_years: args.depreciation_years,
            })?;
            if json {
                report::json(&comparison)?;
            } else {
                report::loan_lease(&comparison);
            }
        }
        Commands::Turnover { basis, items } => {
            let lines = turnover_report(basis.into(), &items)?;
            if json {
                report::json(&lines)?;
            } else {
                report::turnover(&lines);
            }
        }
        Commands::Substitutes(args) => {
            let scenarios = if args.scenarios.is_empty() {
                default_scenarios()
            } else {
                args.scenarios
            };
            let analysis = substitutes_sensitivity(
                &SubstitutesInput {
                    price_reduction: args.price_reduction,
                    contribution_margin: args.margin,
                    max_market_capacity: args.market_capacity,
                },
                &scenarios,
            )?;
            if json {
                report::json(&analysis)?;
            } else {
                report::substitutes(&analysis);
            }
        }
        Commands::SupplierCredit(args) => {
            let analysis = supplier_credit(&SupplierCreditInput {
                credit_days: args.credit_days,
                discount: args.discount,
                cash_share: args.cash_share,
                current_sales: args.current_sales,
                unit_price: args.unit_price,
                unit_cost: args.unit_cost,
                interest_rate: args.interest_rate,
            })?;
            if json {
                report::json(&analysis)?;
            } else {
                report::supplier_credit(&analysis);
            }
        }
        Commands::UnitCost(args) => {
            let costs = unit_costs(&UnitCostInput {
                regular_units: args.regular_units,
                overtime_units: args.overtime_units,
                raw_material_cost: args.raw_material_cost,
                operating_cost_regular: args.operating_cost_regular,
                operating_cost_overtime: args.operating_cost_overtime,
                labor_cost_regular: args.labor_cost_regular,
                labor_cost_overtime: args.labor_cost_overtime,
            })?;
            if json {
                report::json(&costs)?;
            } else {
                report::unit_cost(&costs);
            }
        }
        Commands::LossThreshold(args) => {
            let threshold = sales_loss_threshold(&LossThresholdInput {
                competitor_old_price: args.competitor_old_price,
                competitor_new_price: args.competitor_new_price,
                our_price: args.our_price,
                unit_cost: args.unit_cost,
            })?;
            if json {
                report::json(&threshold)?;
            } else {
                report::loss_threshold(&threshold);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
