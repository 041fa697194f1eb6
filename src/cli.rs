// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, value_parser, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as pretty JSON").action(ArgAction::SetTrue))
        .arg(arg!(--jsonl "Print as JSON lines").action(ArgAction::SetTrue))
}

pub fn build_cli() -> Command {
    Command::new("dompet")
        .version(clap::crate_version!())
        .about("Household budget targets, actuals, debts and savings goals")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("account")
                .about("Bank and e-wallet accounts")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--"type" <TYPE> "Bank or E-Wallet").required(true))
                        .arg(arg!(--balance <AMOUNT> "Opening balance").required(false)),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Income and expense transactions")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--date <DATE>).required(true))
                        .arg(arg!(--"type" <TYPE> "income or expense").required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--description <TEXT>).required(false))
                        .arg(arg!(--account <ACCOUNT>).required(false)),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(--id <ID>).value_parser(value_parser!(i64)).required(true))
                        .arg(arg!(--date <DATE>).required(false))
                        .arg(arg!(--"type" <TYPE>).required(false))
                        .arg(arg!(--amount <AMOUNT>).required(false))
                        .arg(arg!(--category <CATEGORY>).required(false))
                        .arg(arg!(--description <TEXT>).required(false))
                        .arg(arg!(--account <ACCOUNT>).required(false)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(arg!(--id <ID>).value_parser(value_parser!(i64)).required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(arg!(--month <MONTH>).required(false))
                        .arg(arg!(--category <CATEGORY>).required(false))
                        .arg(
                            arg!(--limit <N>)
                                .value_parser(value_parser!(usize))
                                .required(false),
                        ),
                )),
        )
        .subcommand(
            Command::new("target")
                .about("Monthly budget targets")
                .subcommand(
                    Command::new("set-item")
                        .arg(arg!(--month <MONTH>).required(true))
                        .arg(arg!(--section <SECTION>).required(true))
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--id <ID> "Line item id; generated when omitted").required(false)),
                )
                .subcommand(
                    Command::new("rm-item")
                        .arg(arg!(--month <MONTH>).required(true))
                        .arg(arg!(--id <ID>).required(true)),
                )
                .subcommand(json_flags(
                    Command::new("show").arg(arg!(--month <MONTH>).required(true)),
                ))
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("actual")
                .about("Realized amounts against a month's target")
                .subcommand(
                    Command::new("set")
                        .arg(arg!(--month <MONTH>).required(true))
                        .arg(arg!(--item <ID>).required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true)),
                )
                .subcommand(json_flags(
                    Command::new("report").arg(arg!(--month <MONTH>).required(true)),
                )),
        )
        .subcommand(
            Command::new("debt")
                .about("Amortizing debts")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--source <SOURCE>).required(true))
                        .arg(arg!(--total <AMOUNT>).required(true))
                        .arg(arg!(--installment <AMOUNT>).required(true))
                        .arg(arg!(--tenor <MONTHS>).value_parser(value_parser!(i64)).required(true))
                        .arg(arg!(--"due-day" <DAY>).value_parser(value_parser!(u32).range(1..=31)).required(true)),
                )
                .subcommand(
                    Command::new("onboard")
                        .about("Add a debt that is already partly paid")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--source <SOURCE>).required(true))
                        .arg(arg!(--remaining <AMOUNT>).required(true))
                        .arg(arg!(--"remaining-tenor" <MONTHS>).value_parser(value_parser!(i64)).required(true))
                        .arg(arg!(--installment <AMOUNT>).required(true))
                        .arg(arg!(--tenor <MONTHS>).value_parser(value_parser!(i64)).required(true))
                        .arg(arg!(--"due-day" <DAY>).value_parser(value_parser!(u32).range(1..=31)).required(true))
                        .arg(arg!(--today <DATE>).required(false)),
                )
                .subcommand(
                    Command::new("pay")
                        .arg(arg!(--id <ID>).value_parser(value_parser!(i64)).required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--date <DATE>).required(false))
                        .arg(arg!(--account <ACCOUNT> "Also record an expense from this account").required(false)),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(Command::new("history"))),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--source <SOURCE>).required(true))
                        .arg(arg!(--target <AMOUNT>).required(true))
                        .arg(arg!(--deadline <DATE>).required(true))
                        .arg(arg!(--initial <AMOUNT> "Amount already saved").required(false))
                        .arg(arg!(--emergency "Mark as the emergency fund").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("deposit")
                        .arg(arg!(--id <ID>).value_parser(value_parser!(i64)).required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--date <DATE>).required(false))
                        .arg(arg!(--account <ACCOUNT> "Also record a savings expense from this account").required(false)),
                )
                .subcommand(
                    Command::new("withdraw")
                        .arg(arg!(--id <ID>).value_parser(value_parser!(i64)).required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--date <DATE>).required(false)),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(arg!(--today <DATE>).required(false)),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Monthly, yearly and period reports")
                .subcommand(json_flags(
                    Command::new("month").arg(arg!(--month <MONTH>).required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("year")
                        .arg(arg!(--year <YEAR>).value_parser(value_parser!(i32)).required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("period")
                        .arg(arg!(--month <MONTH>).required(false))
                        .arg(arg!(--year <YEAR>).value_parser(value_parser!(i32)).required(false)),
                )),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("transactions").arg(arg!(--path <CSV>).required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(arg!(--format <FMT> "csv|json").required(true))
                        .arg(arg!(--out <PATH>).required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored records for inconsistencies"))
        .subcommand(
            Command::new("config")
                .about("Settings stored in the database")
                .subcommand(Command::new("get").arg(arg!(<KEY>)))
                .subcommand(Command::new("set").arg(arg!(<KEY>)).arg(arg!(<VALUE>))),
        )
}
