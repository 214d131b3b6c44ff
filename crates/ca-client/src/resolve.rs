//! Entity resolvers
//!
//! Each resolver turns a parsed document into typed records, pulling
//! cross-referenced entities through a [`ResolveContext`]. Resolution runs
//! in dependency order (projects, then tasks, then timeslips) and embeds
//! resolved copies, so the result graph never contains reference cycles.
//!
//! Numeric fields are read leniently: a missing or garbled value is 0,
//! not an error.

use ca_core::{CaResult, Document, Id, Node, Response};
use ca_models::{rates, Contact, Invoice, InvoiceItem, Project, Task, Timeslip, User};
use chrono::NaiveDate;
use tracing::warn;

/// Lookup of already-known entities, used to resolve cross-references.
///
/// The agent implements this over its own (cached) operations; tests can
/// implement it over in-memory collections.
pub trait ResolveContext {
    fn project_by_id(&self, id: Id) -> CaResult<Option<Project>>;
    fn tasks_for_project(&self, project_id: Id) -> CaResult<Vec<Task>>;
}

/// Resolve all `project` elements in document order.
pub fn projects(doc: &Document) -> CaResult<Vec<Project>> {
    doc.select("project").into_iter().map(project).collect()
}

fn project(node: &Node) -> CaResult<Project> {
    let raw_rate = f64_of(node, "normal-billing-rate");
    let billing_period = text_of(node, "billing-period");
    let hours_per_day = f64_of(node, "hours-per-day");
    let rates = rates::derive(raw_rate, &billing_period, hours_per_day)?;
    Ok(Project {
        id: id_of(node, "id"),
        name: text_of(node, "name"),
        currency: text_of(node, "currency"),
        hourly_billing_rate: rates.hourly,
        daily_billing_rate: rates.daily,
        hours_per_day,
        contact_id: opt_id_of(node, "contact-id"),
    })
}

/// Resolve all `task` elements, embedding each task's owning project.
pub fn tasks(doc: &Document, ctx: &dyn ResolveContext) -> CaResult<Vec<Task>> {
    doc.select("task")
        .into_iter()
        .map(|node| task(node, ctx))
        .collect()
}

fn task(node: &Node, ctx: &dyn ResolveContext) -> CaResult<Task> {
    let project = ctx.project_by_id(id_of(node, "project-id"))?;
    let raw_rate = f64_of(node, "billing-rate");
    let billing_period = text_of(node, "billing-period");
    let rates = match &project {
        Some(project) => rates::derive(raw_rate, &billing_period, project.hours_per_day)?,
        // Without a project there is no hours-per-day to convert with.
        None => rates::BillingRates {
            hourly: raw_rate,
            daily: raw_rate,
        },
    };
    Ok(Task {
        id: id_of(node, "id"),
        name: text_of(node, "name"),
        project,
        hourly_billing_rate: rates.hourly,
        daily_billing_rate: rates.daily,
        billable: text_of(node, "is-billable") == "true",
    })
}

/// Resolve all `timeslip` elements, pricing each one as it resolves.
///
/// A timeslip whose project cannot be resolved is dropped from the result:
/// one bad cross-reference must not fail the whole batch, and a placeholder
/// entry would poison the cost sums downstream. An absent task is not an
/// error; the project's rate applies instead.
pub fn timeslips(doc: &Document, ctx: &dyn ResolveContext) -> CaResult<Vec<Timeslip>> {
    let mut resolved = Vec::new();
    for node in doc.select("timeslip") {
        let project_id = id_of(node, "project-id");
        let Some(project) = ctx.project_by_id(project_id)? else {
            warn!(
                timeslip = id_of(node, "id"),
                project_id, "dropping timeslip with unresolvable project"
            );
            continue;
        };
        let task_id = id_of(node, "task-id");
        let task = ctx
            .tasks_for_project(project.id)?
            .into_iter()
            .find(|task| task.id == task_id);
        let hours = f64_of(node, "hours");
        let hourly_rate = task
            .as_ref()
            .map(|task| task.hourly_billing_rate)
            .unwrap_or(project.hourly_billing_rate);
        resolved.push(Timeslip {
            id: id_of(node, "id"),
            project,
            task,
            hours,
            date: date_of(node, "dated-on"),
            cost: hourly_rate * hours,
            comment: text_of(node, "comment"),
            status: text_of(node, "status"),
        });
    }
    Ok(resolved)
}

/// Resolve all `invoice` elements with their items in document order.
///
/// A missing project reference embeds `None` here, it never drops the
/// invoice — deliberately asymmetric with the timeslip policy.
pub fn invoices(doc: &Document, ctx: &dyn ResolveContext) -> CaResult<Vec<Invoice>> {
    let mut resolved = Vec::new();
    for node in doc.select("invoice") {
        let mut items = Vec::new();
        for item in node.select("invoice-item") {
            let price = f64_of(item, "price");
            let quantity = f64_of(item, "quantity");
            let project = ctx.project_by_id(id_of(item, "project-id"))?;
            items.push(InvoiceItem {
                id: id_of(item, "id"),
                invoice_id: id_of(item, "invoice-id"),
                project_id: project.as_ref().map(|project| project.id),
                project,
                item_type: text_of(item, "item-type"),
                description: text_of(item, "description"),
                price,
                quantity,
                // Always derived, never read from the wire.
                cost: price * quantity,
            });
        }
        let project = ctx.project_by_id(id_of(node, "project-id"))?;
        resolved.push(Invoice {
            id: id_of(node, "id"),
            project_id: project.as_ref().map(|project| project.id),
            project,
            description: text_of(node, "description"),
            reference: text_of(node, "reference"),
            amount: f64_of(node, "net-value"),
            status: text_of(node, "status"),
            dated_on: date_of(node, "dated-on"),
            due_on: date_of(node, "due-on"),
            items,
        });
    }
    Ok(resolved)
}

/// Resolve all `contact` elements, attaching each contact's projects.
pub fn contacts(doc: &Document, projects: &[Project]) -> CaResult<Vec<Contact>> {
    Ok(doc
        .select("contact")
        .into_iter()
        .map(|node| {
            let id = id_of(node, "id");
            Contact {
                id,
                organisation_name: text_of(node, "organisation-name"),
                first_name: text_of(node, "first-name"),
                last_name: text_of(node, "last-name"),
                address1: text_of(node, "address1"),
                address2: text_of(node, "address2"),
                address3: text_of(node, "address3"),
                town: text_of(node, "town"),
                region: text_of(node, "region"),
                postcode: text_of(node, "postcode"),
                country: text_of(node, "country"),
                phone_number: text_of(node, "phone-number"),
                email: text_of(node, "email"),
                billing_email: text_of(node, "billing-email"),
                contact_name_on_invoices: text_of(node, "contact-name-on-invoices") == "true",
                charge_sales_tax: text_of(node, "charge-sales-tax") == "true",
                sales_tax_registration_number: text_of(node, "sales-tax-registration-number"),
                account_balance: f64_of(node, "account-balance"),
                projects: projects
                    .iter()
                    .filter(|project| project.contact_id == Some(id))
                    .cloned()
                    .collect(),
            }
        })
        .collect())
}

/// Build the authenticated user from the `verify` response headers.
pub fn user_from_headers(response: &Response) -> User {
    User {
        id: response.header("user_id").unwrap_or_default().to_string(),
        permissions: response
            .header("user_permission_level")
            .unwrap_or_default()
            .to_string(),
        company_type: response
            .header("company_type")
            .unwrap_or_default()
            .to_string(),
    }
}

fn text_of(node: &Node, tag: &str) -> String {
    node.first(tag)
        .map(|child| child.text().trim().to_string())
        .unwrap_or_default()
}

fn f64_of(node: &Node, tag: &str) -> f64 {
    text_of(node, tag).parse().unwrap_or(0.0)
}

fn id_of(node: &Node, tag: &str) -> Id {
    text_of(node, tag).parse().unwrap_or(0)
}

fn opt_id_of(node: &Node, tag: &str) -> Option<Id> {
    text_of(node, tag).parse().ok()
}

fn date_of(node: &Node, tag: &str) -> Option<NaiveDate> {
    let text = text_of(node, tag);
    // `dated-on` may carry a full timestamp; the leading date is enough.
    let date_part = text.get(..10).unwrap_or(text.as_str());
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(tag: &str, text: &str) -> Node {
        Node::element(tag).with_text(text)
    }

    fn project_node(id: &str, rate: &str, period: &str, hours_per_day: &str) -> Node {
        Node::element("project")
            .with_child(field("id", id))
            .with_child(field("name", "test project"))
            .with_child(field("currency", "GBP"))
            .with_child(field("normal-billing-rate", rate))
            .with_child(field("billing-period", period))
            .with_child(field("hours-per-day", hours_per_day))
    }

    fn known_project(id: Id, hourly: f64) -> Project {
        Project {
            id,
            name: "test project".into(),
            currency: "GBP".into(),
            hourly_billing_rate: hourly,
            daily_billing_rate: hourly * 8.0,
            hours_per_day: 8.0,
            contact_id: None,
        }
    }

    struct StaticContext {
        projects: Vec<Project>,
        tasks: Vec<Task>,
    }

    impl ResolveContext for StaticContext {
        fn project_by_id(&self, id: Id) -> CaResult<Option<Project>> {
            Ok(self.projects.iter().find(|p| p.id == id).cloned())
        }

        fn tasks_for_project(&self, project_id: Id) -> CaResult<Vec<Task>> {
            Ok(self
                .tasks
                .iter()
                .filter(|t| t.project.as_ref().map(|p| p.id) == Some(project_id))
                .cloned()
                .collect())
        }
    }

    #[test]
    fn test_projects_derive_both_rates() {
        let doc = Document::new(
            Node::element("projects")
                .with_child(project_node("1", "45", "hour", "8"))
                .with_child(project_node("2", "400", "day", "8")),
        );

        let projects = projects(&doc).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, 1);
        assert_eq!(projects[0].hourly_billing_rate, 45.0);
        assert_eq!(projects[0].daily_billing_rate, 360.0);
        assert_eq!(projects[1].id, 2);
        assert_eq!(projects[1].hourly_billing_rate, 50.0);
        assert_eq!(projects[1].daily_billing_rate, 400.0);
    }

    #[test]
    fn test_project_without_contact_link() {
        let doc = Document::new(project_node("1", "45", "hour", "8"));
        let projects = projects(&doc).unwrap();
        assert_eq!(projects[0].contact_id, None);
    }

    #[test]
    fn test_task_rates_use_project_hours_per_day() {
        let doc = Document::new(
            Node::element("tasks").with_child(
                Node::element("task")
                    .with_child(field("id", "1"))
                    .with_child(field("project-id", "1"))
                    .with_child(field("name", "Development"))
                    .with_child(field("billing-rate", "320"))
                    .with_child(field("billing-period", "day"))
                    .with_child(field("is-billable", "true")),
            ),
        );
        let ctx = StaticContext {
            projects: vec![known_project(1, 45.0)],
            tasks: vec![],
        };

        let tasks = tasks(&doc, &ctx).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].hourly_billing_rate, 40.0);
        assert_eq!(tasks[0].daily_billing_rate, 320.0);
        assert!(tasks[0].billable);
        assert_eq!(tasks[0].project.as_ref().unwrap().id, 1);
    }

    #[test]
    fn test_task_without_project_keeps_raw_rate() {
        let doc = Document::new(
            Node::element("tasks").with_child(
                Node::element("task")
                    .with_child(field("id", "9"))
                    .with_child(field("project-id", "42"))
                    .with_child(field("billing-rate", "50"))
                    .with_child(field("billing-period", "hour"))
                    .with_child(field("is-billable", "false")),
            ),
        );
        let ctx = StaticContext {
            projects: vec![],
            tasks: vec![],
        };

        let tasks = tasks(&doc, &ctx).unwrap();
        assert!(tasks[0].project.is_none());
        assert_eq!(tasks[0].hourly_billing_rate, 50.0);
        assert_eq!(tasks[0].daily_billing_rate, 50.0);
        assert!(!tasks[0].billable);
    }

    fn timeslip_node(id: &str, project_id: &str, hours: &str) -> Node {
        Node::element("timeslip")
            .with_child(field("id", id))
            .with_child(field("project-id", project_id))
            .with_child(field("hours", hours))
            .with_child(field("dated-on", "2010-05-09T14:25:57+01:00"))
            .with_child(field("comment", "work"))
            .with_child(field("status", "billed"))
    }

    #[test]
    fn test_timeslip_cost_uses_project_rate_without_task() {
        let doc = Document::new(
            Node::element("timeslips")
                .with_child(timeslip_node("1", "1", "10"))
                .with_child(timeslip_node("2", "1", "8")),
        );
        let ctx = StaticContext {
            projects: vec![known_project(1, 45.0)],
            tasks: vec![],
        };

        let timeslips = timeslips(&doc, &ctx).unwrap();
        assert_eq!(timeslips.len(), 2);
        assert_eq!(timeslips[0].cost, 450.0);
        assert_eq!(timeslips[1].cost, 360.0);
        assert_eq!(
            timeslips[0].date,
            NaiveDate::from_ymd_opt(2010, 5, 9)
        );
    }

    #[test]
    fn test_timeslip_cost_prefers_task_rate() {
        let doc = Document::new(
            Node::element("timeslips").with_child(
                timeslip_node("1", "1", "10").with_child(field("task-id", "7")),
            ),
        );
        let ctx = StaticContext {
            projects: vec![known_project(1, 45.0)],
            tasks: vec![Task {
                id: 7,
                name: "Design".into(),
                project: Some(known_project(1, 45.0)),
                hourly_billing_rate: 60.0,
                daily_billing_rate: 480.0,
                billable: true,
            }],
        };

        let timeslips = timeslips(&doc, &ctx).unwrap();
        assert_eq!(timeslips[0].cost, 600.0);
        assert_eq!(timeslips[0].task.as_ref().unwrap().id, 7);
    }

    #[test]
    fn test_timeslip_with_unresolvable_project_is_dropped() {
        let doc = Document::new(
            Node::element("timeslips")
                .with_child(timeslip_node("1", "1", "10"))
                .with_child(timeslip_node("2", "99", "4"))
                .with_child(timeslip_node("3", "1", "8")),
        );
        let ctx = StaticContext {
            projects: vec![known_project(1, 45.0)],
            tasks: vec![],
        };

        let timeslips = timeslips(&doc, &ctx).unwrap();
        assert_eq!(timeslips.len(), 2);
        assert_eq!(timeslips[0].id, 1);
        assert_eq!(timeslips[1].id, 3);
    }

    #[test]
    fn test_invoice_item_cost_ignores_wire_total() {
        let doc = Document::new(
            Node::element("invoices").with_child(
                Node::element("invoice")
                    .with_child(field("id", "5"))
                    .with_child(field("project-id", "1"))
                    .with_child(field("reference", "INV-5"))
                    .with_child(field("net-value", "540"))
                    .with_child(field("status", "Sent"))
                    .with_child(field("dated-on", "2010-06-01"))
                    .with_child(field("due-on", "2010-07-01"))
                    .with_child(
                        Node::element("invoice-item")
                            .with_child(field("id", "11"))
                            .with_child(field("invoice-id", "5"))
                            .with_child(field("item-type", "Hours"))
                            .with_child(field("price", "45"))
                            .with_child(field("quantity", "12"))
                            // A stated total must never win over price * quantity.
                            .with_child(field("cost", "9999")),
                    ),
            ),
        );
        let ctx = StaticContext {
            projects: vec![known_project(1, 45.0)],
            tasks: vec![],
        };

        let invoices = invoices(&doc, &ctx).unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].items.len(), 1);
        assert_eq!(invoices[0].items[0].cost, 540.0);
        assert_eq!(invoices[0].project_id, Some(1));
    }

    #[test]
    fn test_invoice_item_without_project_is_kept() {
        let doc = Document::new(
            Node::element("invoices").with_child(
                Node::element("invoice")
                    .with_child(field("id", "6"))
                    .with_child(field("reference", "INV-6"))
                    .with_child(
                        Node::element("invoice-item")
                            .with_child(field("id", "12"))
                            .with_child(field("invoice-id", "6"))
                            .with_child(field("price", "100"))
                            .with_child(field("quantity", "2")),
                    ),
            ),
        );
        let ctx = StaticContext {
            projects: vec![known_project(1, 45.0)],
            tasks: vec![],
        };

        let invoices = invoices(&doc, &ctx).unwrap();
        assert_eq!(invoices.len(), 1);
        assert!(invoices[0].project.is_none());
        assert!(invoices[0].items[0].project.is_none());
        assert_eq!(invoices[0].items[0].cost, 200.0);
    }

    #[test]
    fn test_contact_collects_its_projects() {
        let doc = Document::new(
            Node::element("contacts").with_child(
                Node::element("contact")
                    .with_child(field("id", "3"))
                    .with_child(field("organisation-name", "Acme Ltd"))
                    .with_child(field("first-name", "Ada"))
                    .with_child(field("billing-email", "billing@acme.example"))
                    .with_child(field("charge-sales-tax", "true"))
                    .with_child(field("account-balance", "-120.5")),
            ),
        );
        let mut linked = known_project(1, 45.0);
        linked.contact_id = Some(3);
        let unlinked = known_project(2, 50.0);

        let contacts = contacts(&doc, &[linked, unlinked]).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].organisation_name, "Acme Ltd");
        assert!(contacts[0].charge_sales_tax);
        assert_eq!(contacts[0].account_balance, -120.5);
        assert_eq!(contacts[0].projects.len(), 1);
        assert_eq!(contacts[0].projects[0].id, 1);
    }

    #[test]
    fn test_user_from_headers() {
        let mut response = Response::default();
        response.headers.insert("user_id".into(), "123".into());
        response
            .headers
            .insert("user_permission_level".into(), "admin".into());
        response.headers.insert("company_type".into(), "ltd".into());

        let user = user_from_headers(&response);
        assert_eq!(user.id, "123");
        assert_eq!(user.permissions, "admin");
        assert_eq!(user.company_type, "ltd");
    }

    #[test]
    fn test_user_with_missing_headers_is_blank() {
        let user = user_from_headers(&Response::default());
        assert_eq!(user.id, "");
        assert_eq!(user.permissions, "");
        assert_eq!(user.company_type, "");
    }
}
