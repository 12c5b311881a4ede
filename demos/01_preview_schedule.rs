/// preview a repayment schedule before anything is persisted
use koperasi_loan_rs::{AmortizationSchedule, LoanTerm, Money, Rate, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    // Rp 12,000,000 over 12 months at 12% per year
    let schedule = AmortizationSchedule::generate(
        Money::from_major(12_000_000),
        LoanTerm::new(12, Rate::from_percentage(12)),
        time.now(),
    )?;

    println!("no  due date    principal   interest    total due");
    for row in &schedule.installments {
        println!(
            "{:>2}  {}  {:>10}  {:>9}  {:>10}",
            row.number,
            row.due_date.format("%Y-%m-%d"),
            row.principal_portion,
            row.interest_portion,
            row.total_due,
        );
    }

    println!("total interest:  {}", schedule.total_interest);
    println!("total repayment: {}", schedule.total_repayment);

    Ok(())
}
