/// cancel the closing payment of a settled loan and watch it un-settle
use koperasi_loan_rs::{
    LoanAccount, LoanApplication, LoanStatus, LoanTerm, Money, Rate, Role, SafeTimeProvider,
    TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    let mut loan = LoanAccount::new(LoanApplication::submit(
        Uuid::new_v4(),
        Uuid::new_v4(),
        LoanTerm::new(2, Rate::from_percentage(10)),
        Money::from_major(2_000_000),
        time.now(),
    ));
    loan.transition(LoanStatus::ApprovedByAccounting, Role::Admin, &time)?;
    loan.transition(LoanStatus::Approved, Role::Admin, &time)?;

    let first = loan.installment(1).unwrap().total_due;
    let second = loan.installment(2).unwrap().total_due;
    loan.record_payment(1, first, time.now())?;
    let closing = loan.record_payment(2, second, time.now())?;
    println!("after closing payment: {:?}", loan.status());

    // the cashier entered the wrong amount; take the payment back
    loan.cancel_payment(closing.id, &time)?;
    println!("after cancellation:    {:?}", loan.status());

    let summary = loan.summary();
    println!(
        "paid {} so far, {} principal outstanding, installment {} due next",
        summary.total_paid,
        summary.remaining_principal,
        summary.next_due_installment.unwrap(),
    );

    // PaymentCancelled tells the journal/inventory collaborator to reverse
    for event in loan.take_events() {
        println!("event: {event:?}");
    }

    Ok(())
}
