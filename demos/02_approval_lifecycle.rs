/// drive a loan from submission through approval to full settlement
use koperasi_loan_rs::{
    LoanAccount, LoanApplication, LoanStatus, LoanTerm, Money, Rate, Role, SafeTimeProvider,
    TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    let application = LoanApplication::submit(
        Uuid::new_v4(),
        Uuid::new_v4(),
        LoanTerm::new(3, Rate::from_percentage(12)),
        Money::from_major(3_000_000),
        time.now(),
    );
    let mut loan = LoanAccount::new(application);
    println!("submitted: {:?}", loan.status());

    // two-stage approval: accounting review, then manager finalization
    loan.transition(LoanStatus::ApprovedByAccounting, Role::Akunting, &time)?;
    loan.transition(LoanStatus::Approved, Role::Manager, &time)?;
    println!("approved with {} installments", loan.installments.len());

    // pay every installment; the last one settles the loan
    for number in 1..=loan.tenor() {
        let due = loan.installment(number).unwrap().total_due;
        loan.record_payment(number, due, time.now())?;
        println!(
            "paid installment {number}: {due}, status {:?}",
            loan.status()
        );
    }
    assert_eq!(loan.status(), LoanStatus::Lunas);

    // hand the drained events to the journal collaborator
    for event in loan.take_events() {
        println!("event: {event:?}");
    }

    println!("{}", loan.snapshot().to_json_pretty()?);

    Ok(())
}
