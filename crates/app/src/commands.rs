use std::{fs, io::Write};

use chrono::NaiveDate;
use engine::{Bill, BillBook, Currency, ItemEdit, ItemInput};
use export::{BillReport, file_name, render_text, to_csv};
use notify::{
    BillMeta, Delivery, FallbackReason, Notifier, NotifyError, ResendTransport, report_payload,
};
use storage::BillStore;

use crate::{
    cli::{
        BillCommand, Command, ExportArgs, Format, ItemCommand, ParticipantCommand, SendArgs,
    },
    error::{AppError, Result},
    lookup::{resolve, short_id},
    settings::Mail,
};

const CURRENCY: Currency = Currency::Lkr;

/// Runs one command against the stored bills.
///
/// Mutating commands save the whole collection once the change has been
/// applied; failed or read-only commands leave the store untouched.
pub async fn execute<S, W>(
    command: Command,
    store: &mut S,
    mail: Option<&Mail>,
    today: NaiveDate,
    out: &mut W,
) -> Result<()>
where
    S: BillStore,
    W: Write,
{
    let mut book = BillBook::from_bills(store.load()?)?;

    let changed = match command {
        Command::Bill(args) => bill(&mut book, args.command, today, out)?,
        Command::Participant(args) => participant(&mut book, args.command, out)?,
        Command::Item(args) => item(&mut book, args.command, out)?,
        Command::Export(args) => {
            export(&book, args, today, out)?;
            false
        }
        Command::Send(args) => {
            send(&book, args, mail, out).await?;
            false
        }
    };

    if changed {
        store.save(book.bills())?;
    }
    Ok(())
}

fn bill<W: Write>(
    book: &mut BillBook,
    command: BillCommand,
    today: NaiveDate,
    out: &mut W,
) -> Result<bool> {
    match command {
        BillCommand::New { title, date } => {
            let id = book.create_bill(date.unwrap_or(today));
            let bill = book.bill_mut(id)?;
            if let Some(title) = title {
                bill.set_title(Some(&title));
            }
            tracing::info!(bill = %id, "created bill");
            writeln!(out, "created {} ({})", display_title(bill), short_id(id))?;
            Ok(true)
        }
        BillCommand::List => {
            if book.bills().is_empty() {
                writeln!(out, "no bills yet")?;
            }
            for bill in book.bills() {
                writeln!(
                    out,
                    "{}  {}  {}  {}  {} participants",
                    short_id(bill.id()),
                    bill.date(),
                    display_title(bill),
                    bill.total().format(CURRENCY),
                    bill.participants().len()
                )?;
            }
            Ok(false)
        }
        BillCommand::Show { bill } => {
            let bill = book.bill(resolve(book.bills(), &bill)?)?;
            show(bill, out)?;
            Ok(false)
        }
        BillCommand::Rename { bill, title } => {
            let bill = book.bill_mut(resolve(book.bills(), &bill)?)?;
            bill.set_title(Some(&title));
            writeln!(out, "renamed to {}", display_title(bill))?;
            Ok(true)
        }
        BillCommand::Redate { bill, date } => {
            let bill = book.bill_mut(resolve(book.bills(), &bill)?)?;
            bill.set_date(date);
            writeln!(out, "{} is now dated {date}", display_title(bill))?;
            Ok(true)
        }
        BillCommand::Delete { bill } => {
            let removed = book.delete_bill(resolve(book.bills(), &bill)?)?;
            tracing::info!(bill = %removed.id(), "deleted bill");
            writeln!(out, "deleted {}", display_title(&removed))?;
            Ok(true)
        }
    }
}

fn participant<W: Write>(
    book: &mut BillBook,
    command: ParticipantCommand,
    out: &mut W,
) -> Result<bool> {
    match command {
        ParticipantCommand::Add { bill, name, email } => {
            let bill = book.bill_mut(resolve(book.bills(), &bill)?)?;
            let id = bill.add_participant(&name, email.as_deref())?;
            let added = bill.participant(id)?;
            writeln!(out, "added {} ({})", added.name, short_id(id))?;
            Ok(true)
        }
        ParticipantCommand::Remove { bill, who } => {
            let bill = book.bill_mut(resolve(book.bills(), &bill)?)?;
            let removed = bill.remove_participant(resolve(bill.participants(), &who)?)?;
            writeln!(out, "removed {}", removed.name)?;
            Ok(true)
        }
    }
}

fn item<W: Write>(book: &mut BillBook, command: ItemCommand, out: &mut W) -> Result<bool> {
    match command {
        ItemCommand::Add {
            bill,
            name,
            price,
            quantity,
        } => {
            let bill = book.bill_mut(resolve(book.bills(), &bill)?)?;
            let input = ItemInput::parse(&name, &price, quantity.as_deref())?;
            let id = bill.add_item(input)?;
            let added = bill.item(id)?;
            writeln!(
                out,
                "added {} ({}): {} x {} = {}",
                added.name(),
                short_id(id),
                added.quantity(),
                added.unit_price().format(CURRENCY),
                added.total().format(CURRENCY)
            )?;
            Ok(true)
        }
        ItemCommand::Edit {
            bill,
            item,
            name,
            price,
            quantity,
        } => {
            let edit = ItemEdit::parse(name.as_deref(), price.as_deref(), quantity.as_deref())?;
            if edit.is_empty() {
                return Err(AppError::Input(
                    "nothing to change, pass --name, --price or --quantity".to_string(),
                ));
            }
            let bill = book.bill_mut(resolve(book.bills(), &bill)?)?;
            let edited = bill.edit_item(resolve(bill.items(), &item)?, edit)?;
            writeln!(
                out,
                "updated {}: {} x {} = {}",
                edited.name(),
                edited.quantity(),
                edited.unit_price().format(CURRENCY),
                edited.total().format(CURRENCY)
            )?;
            Ok(true)
        }
        ItemCommand::Delete { bill, item } => {
            let bill = book.bill_mut(resolve(book.bills(), &bill)?)?;
            let removed = bill.delete_item(resolve(bill.items(), &item)?)?;
            writeln!(out, "deleted {}", removed.name())?;
            Ok(true)
        }
        ItemCommand::Toggle { bill, item, who } => {
            let bill = book.bill_mut(resolve(book.bills(), &bill)?)?;
            let item_id = resolve(bill.items(), &item)?;
            let participant_id = resolve(bill.participants(), &who)?;
            bill.toggle_assignment(item_id, participant_id)?;

            let toggled = bill.item(item_id)?;
            writeln!(
                out,
                "{} is {}",
                toggled.name(),
                allocation_label(bill, toggled)
            )?;
            Ok(true)
        }
    }
}

fn export<W: Write>(book: &BillBook, args: ExportArgs, today: NaiveDate, out: &mut W) -> Result<()> {
    let bill = book.bill(resolve(book.bills(), &args.bill)?)?;
    let report = BillReport::build(bill, today);
    let bytes = match args.format {
        Format::Csv => to_csv(&report)?,
        Format::Text => render_text(&report).into_bytes(),
    };

    match args.out {
        Some(target) => {
            let target = if target.is_dir() {
                target.join(file_name(bill, args.format.extension()))
            } else {
                target
            };
            fs::write(&target, bytes)?;
            tracing::info!("wrote export to {}", target.display());
            writeln!(out, "wrote {}", target.display())?;
        }
        None => out.write_all(&bytes)?,
    }
    Ok(())
}

async fn send<W: Write>(
    book: &BillBook,
    args: SendArgs,
    mail: Option<&Mail>,
    out: &mut W,
) -> Result<()> {
    let bill = book.bill(resolve(book.bills(), &args.bill)?)?;
    let participant_id = resolve(bill.participants(), &args.who)?;
    let summary = bill
        .summaries()
        .into_iter()
        .find(|summary| summary.participant.id == participant_id)
        .ok_or_else(|| engine::EngineError::KeyNotFound(participant_id.to_string()))?;
    let meta = BillMeta::from(bill);

    if args.dry_run {
        let payload = report_payload(&summary, &meta);
        writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
        return Ok(());
    }

    let transport = mail
        .map(|mail| ResendTransport::new(&mail.endpoint, &mail.api_key))
        .transpose()?;
    let notifier = match mail {
        Some(mail) => Notifier::new(transport, mail.from.clone(), mail.timeout()),
        None => Notifier::new(transport, String::new(), std::time::Duration::ZERO),
    };

    let delivery = notifier.deliver(&summary, &meta).await?;
    report_delivery(delivery, &summary.participant.name, out)
}

/// Prints the outcome of a finished delivery; an unfinished one is an error.
fn report_delivery<W: Write>(delivery: Delivery, name: &str, out: &mut W) -> Result<()> {
    match delivery {
        Delivery::Succeeded { message_id } => {
            writeln!(out, "sent report to {name} ({message_id})")?;
        }
        Delivery::FallenBack { reason, mailto } => {
            let why = match reason {
                FallbackReason::Unavailable => "mail service unavailable".to_string(),
                FallbackReason::Failed(err) => err,
                FallbackReason::TimedOut => "mail service timed out".to_string(),
            };
            writeln!(out, "could not send ({why}), open this link to compose it:")?;
            writeln!(out, "{mailto}")?;
        }
        Delivery::Attempting => return Err(NotifyError::Unfinished(name.to_string()).into()),
    }
    Ok(())
}

fn show<W: Write>(bill: &Bill, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{} ({})  id {}",
        display_title(bill),
        bill.date(),
        short_id(bill.id())
    )?;
    writeln!(out, "Total: {}", bill.total().format(CURRENCY))?;

    writeln!(out, "\nParticipants:")?;
    for participant in bill.participants() {
        writeln!(
            out,
            "  {}  {}  {}",
            short_id(participant.id),
            participant.name,
            participant.email.as_deref().unwrap_or("-")
        )?;
    }

    writeln!(out, "\nItems:")?;
    for item in bill.items() {
        writeln!(
            out,
            "  {}  {}  {} x {} = {}  [{}]",
            short_id(item.id()),
            item.name(),
            item.quantity(),
            item.unit_price().format(CURRENCY),
            item.total().format(CURRENCY),
            allocation_label(bill, item)
        )?;
    }

    writeln!(out, "\nSplit:")?;
    for summary in bill.summaries() {
        writeln!(
            out,
            "  {}  {}",
            summary.participant.name,
            summary.total_amount.format(CURRENCY)
        )?;
        for line in &summary.assigned_items {
            let marker = if line.is_shared { " (Shared)" } else { "" };
            writeln!(
                out,
                "    {}{marker}  {}",
                line.item_name,
                line.amount.format(CURRENCY)
            )?;
        }
    }
    Ok(())
}

fn display_title(bill: &Bill) -> &str {
    bill.title().unwrap_or("Untitled Bill")
}

fn allocation_label(bill: &Bill, item: &engine::BillItem) -> String {
    if item.is_shared() {
        "shared".to_string()
    } else {
        format!("assigned to {}", bill.assignee_names(item).join(", "))
    }
}
