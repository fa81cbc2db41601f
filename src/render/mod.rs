//! Markdown rendering of an ownership tree.
//!
//! Pure presentation: takes a resolved [`OwnershipNode`] and produces nested
//! Markdown headings and bullets. Never touches the network or the
//! credential.

use crate::resolver::model::{ChildStatus, CompanyProfile, OwnershipNode, ResolvedController};

/// Render a resolved ownership tree as Markdown.
pub fn markdown(root: &OwnershipNode) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &OwnershipNode, depth: usize) {
    let indent = "    ".repeat(depth);
    let heading = "#".repeat((3 + depth).min(6));
    let profile = &node.profile;

    out.push_str(&format!(
        "{heading} {} ({})\n",
        profile.name, profile.number
    ));
    out.push_str(&format!("{indent}* Status: {}\n", profile.status));
    out.push_str(&format!(
        "{indent}* Incorporated: {}\n",
        profile
            .incorporated_on
            .map(|d| d.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    ));
    out.push_str(&format!(
        "{indent}* Industry (SIC codes): {}\n",
        if profile.sic_codes.is_empty() {
            "N/A".to_string()
        } else {
            profile.sic_codes.join(", ")
        }
    ));
    if let Some(jurisdiction) = non_default_jurisdiction(profile) {
        out.push_str(&format!(
            "{indent}* Jurisdiction: {}\n",
            title_case(jurisdiction)
        ));
    }

    if !profile.share_capital.is_empty() {
        out.push_str(&format!("{indent}#### Share Capital\n"));
        for share_class in &profile.share_capital {
            out.push_str(&format!(
                "{indent}* **Class:** {}\n",
                share_class.class.as_deref().unwrap_or("N/A")
            ));
            out.push_str(&format!(
                "{indent}    * Shares allotted: {}\n",
                share_class.shares_allotted.as_deref().unwrap_or("N/A")
            ));
            if let Some(value) = &share_class.nominal_value_per_share {
                out.push_str(&format!(
                    "{indent}    * Nominal value per share: {value} {}\n",
                    share_class.currency.as_deref().unwrap_or("")
                ));
            }
            if let Some(aggregate) = &share_class.aggregate_nominal_value {
                out.push_str(&format!(
                    "{indent}    * Aggregate nominal value: {aggregate}\n"
                ));
            }
        }
    }

    out.push_str(&format!(
        "{indent}#### Persons with Significant Control (PSCs)\n"
    ));
    if node.controllers.is_empty() {
        out.push_str(&format!(
            "{indent}* No PSCs listed for this company or company is exempt.\n"
        ));
    }
    for controller in &node.controllers {
        write_controller(out, controller, depth, &indent);
    }

    out.push_str(&format!("{indent}---\n"));
}

fn write_controller(
    out: &mut String,
    controller: &ResolvedController,
    depth: usize,
    indent: &str,
) {
    let party = &controller.party;

    out.push_str(&format!(
        "{indent}* **{}** ({})\n",
        party.name,
        party.kind.label()
    ));
    if let Some(nationality) = &party.nationality {
        out.push_str(&format!("{indent}    * Nationality: {nationality}\n"));
    }
    if let Some(residence) = &party.country_of_residence {
        out.push_str(&format!(
            "{indent}    * Country of residence: {residence}\n"
        ));
    }

    if !party.natures_of_control.is_empty() {
        out.push_str(&format!("{indent}    * Natures of control:\n"));
        for nature in &party.natures_of_control {
            out.push_str(&format!(
                "{indent}        * `{}`\n",
                title_case(nature)
            ));
        }
    }

    if let Some(statement) = party
        .statement
        .as_deref()
        .filter(|s| !s.eq_ignore_ascii_case("none"))
    {
        out.push_str(&format!("{indent}    * Statement: *{statement}*\n"));
    }

    if let Some(id) = &party.identification {
        let mut details = Vec::new();
        if let Some(v) = &id.registration_number {
            details.push(format!("Reg no: {v}"));
        }
        if let Some(v) = &id.legal_form {
            details.push(format!("Legal form: {v}"));
        }
        if let Some(v) = &id.legal_authority {
            details.push(format!("Legal authority: {v}"));
        }
        if let Some(v) = &id.country_registered {
            details.push(format!("Country registered: {v}"));
        }
        if let Some(v) = &id.place_registered {
            details.push(format!("Place registered: {v}"));
        }
        if !details.is_empty() {
            out.push_str(&format!(
                "{indent}    * Identification: {}\n",
                details.join("; ")
            ));
        }
    }

    match (&controller.status, &controller.child) {
        (ChildStatus::Resolved, Some(child)) => {
            out.push_str(&format!(
                "{indent}    * **--> Further analysis for {} ({}):**\n",
                party.name, child.profile.number
            ));
            write_node(out, child, depth + 1);
        }
        (ChildStatus::CycleDetected, _) => {
            out.push_str(&format!(
                "{indent}    * *Already on this ownership path (circular reference).*\n"
            ));
        }
        (ChildStatus::DepthLimitReached, _) => {
            out.push_str(&format!(
                "{indent}    * *Reached maximum analysis depth.*\n"
            ));
        }
        (ChildStatus::LookupFailed(kind), _) => {
            out.push_str(&format!(
                "{indent}    * *Could not resolve this controller ({kind}).*\n"
            ));
        }
        // Individuals, statements, and unresolvable corporate references
        // need no extra line; corporate kind without a child is implied by
        // the identification details above.
        _ => {}
    }
}

fn non_default_jurisdiction(profile: &CompanyProfile) -> Option<&str> {
    let jurisdiction = profile.jurisdiction.as_deref()?;
    let pretty = title_case(jurisdiction);
    if pretty == "England Wales" || pretty == "United Kingdom" {
        None
    } else {
        Some(jurisdiction)
    }
}

/// Prettify a hyphenated registry token: `ownership-of-shares-75-to-100-percent`
/// becomes `Ownership Of Shares 75 To 100 Percent`.
fn title_case(raw: &str) -> String {
    raw.split(['-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
