//! Agent facade
//!
//! One agent per account: it owns the credentials, the transport and parser
//! collaborators, a cache gateway scoped to the subdomain, and the
//! exchange-rate source. Every public operation is a blocking fetch wrapped
//! in a `CacheGateway::fetch` keyed by the operation's discriminating
//! argument.

use std::sync::Arc;

use ca_core::{
    CacheGateway, CacheProvider, CaError, CaResult, Credentials, Document, Id, Namespace,
    Transport, XmlParser,
};
use ca_models::{Contact, Invoice, Project, Task, Timeslip, User};
use chrono::NaiveDate;
use tracing::debug;

use crate::exchange::ExchangeRates;
use crate::resolve::{self, ResolveContext};

/// Costs in this currency are reported as-is; anything else is converted
/// through the USD rate.
pub const HOME_CURRENCY: &str = "GBP";

const HOST: &str = "freeagentcentral.com";

/// Read-oriented client for one account's billing data.
pub struct Agent {
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    parser: Arc<dyn XmlParser>,
    cache: CacheGateway,
    exchange: Arc<ExchangeRates>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Build an agent. Fails fast on empty credentials; starts without a
    /// cache provider (every query fetches) and with its own exchange-rate
    /// source.
    pub fn new(
        credentials: Credentials,
        transport: Arc<dyn Transport>,
        parser: Arc<dyn XmlParser>,
    ) -> CaResult<Self> {
        credentials.validate()?;
        let cache = CacheGateway::new(credentials.subdomain.clone(), None);
        let exchange = Arc::new(ExchangeRates::new(transport.clone(), parser.clone()));
        Ok(Self {
            credentials,
            transport,
            parser,
            cache,
            exchange,
        })
    }

    /// Memoize queries through the given provider.
    pub fn with_cache_provider(mut self, provider: Arc<dyn CacheProvider>) -> Self {
        self.cache = CacheGateway::new(self.credentials.subdomain.clone(), Some(provider));
        self
    }

    /// Share an exchange-rate source (process-wide memo) or pin a fixed rate.
    pub fn with_exchange_rates(mut self, exchange: Arc<ExchangeRates>) -> Self {
        self.exchange = exchange;
        self
    }

    /// All projects matching `filter` (e.g. "active", "all"), in document
    /// order. Cached per filter.
    pub fn projects(&self, filter: &str, reload: bool) -> CaResult<Vec<Project>> {
        self.cache.fetch(Namespace::Project, filter, reload, || {
            let doc = self.api("projects", &[("view", filter)])?;
            resolve::projects(&doc)
        })
    }

    /// A single project, looked up within `projects("all")` — relies on the
    /// "all" cache entry rather than its own.
    pub fn project(&self, id: Id) -> CaResult<Option<Project>> {
        Ok(self
            .projects("all", false)?
            .into_iter()
            .find(|project| project.id == id))
    }

    /// Timeslips in the date range, priced at resolution time. The formatted
    /// range doubles as the remote query parameter and the cache key.
    pub fn timeslips(&self, start: NaiveDate, end: NaiveDate, reload: bool) -> CaResult<Vec<Timeslip>> {
        let range = format!("{}_{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
        self.cache.fetch(Namespace::Timeslip, &range, reload, || {
            let doc = self.api("timeslips", &[("view", range.as_str())])?;
            resolve::timeslips(&doc, self)
        })
    }

    /// Tasks of one project. Cached per project id.
    pub fn tasks(&self, project_id: Id, reload: bool) -> CaResult<Vec<Task>> {
        self.cache
            .fetch(Namespace::Task, &project_id.to_string(), reload, || {
                let doc = self.api(&format!("projects/{project_id}/tasks"), &[])?;
                resolve::tasks(&doc, self)
            })
    }

    /// All invoices with their items.
    pub fn invoices(&self, reload: bool) -> CaResult<Vec<Invoice>> {
        self.cache.fetch(Namespace::Invoice, "all", reload, || {
            let doc = self.api("invoices", &[])?;
            resolve::invoices(&doc, self)
        })
    }

    pub fn invoice(&self, id: Id) -> CaResult<Option<Invoice>> {
        Ok(self
            .invoices(false)?
            .into_iter()
            .find(|invoice| invoice.id == id))
    }

    /// All contacts, each carrying its linked projects.
    pub fn contacts(&self, reload: bool) -> CaResult<Vec<Contact>> {
        self.cache.fetch(Namespace::Contact, "all", reload, || {
            let doc = self.api("contacts", &[])?;
            let projects = self.projects("all", false)?;
            resolve::contacts(&doc, &projects)
        })
    }

    pub fn contact(&self, id: Id) -> CaResult<Option<Contact>> {
        Ok(self
            .contacts(false)?
            .into_iter()
            .find(|contact| contact.id == id))
    }

    /// The authenticated user, read from the `verify` response headers.
    /// The body plays no part, so no empty-body check applies here.
    pub fn user(&self, reload: bool) -> CaResult<User> {
        let key = self.credentials.username.clone();
        self.cache.fetch(Namespace::User, &key, reload, || {
            let url = self.url_for("verify", &[]);
            debug!(%url, "verifying credentials");
            let response =
                self.transport
                    .get(&url, &self.credentials.username, &self.credentials.password)?;
            Ok(resolve::user_from_headers(&response))
        })
    }

    pub fn user_id(&self) -> CaResult<String> {
        Ok(self.user(false)?.id)
    }

    /// Total hours recorded in the range.
    pub fn hours_worked(&self, start: NaiveDate, end: NaiveDate) -> CaResult<f64> {
        Ok(self
            .timeslips(start, end, false)?
            .iter()
            .map(|timeslip| timeslip.hours)
            .sum())
    }

    /// Total earned in the range, in the home currency. Costs of projects
    /// billing in another currency are divided by the USD rate.
    pub fn amount_earned(&self, start: NaiveDate, end: NaiveDate) -> CaResult<f64> {
        Ok(self
            .timeslips(start, end, false)?
            .iter()
            .map(|timeslip| {
                if timeslip.project.currency == HOME_CURRENCY {
                    timeslip.cost
                } else {
                    timeslip.cost / self.exchange.usd_rate()
                }
            })
            .sum())
    }

    /// Fetch and parse one resource. An empty body is an error naming the
    /// failing URL; transport errors propagate unmodified.
    fn api(&self, resource: &str, params: &[(&str, &str)]) -> CaResult<Document> {
        let url = self.url_for(resource, params);
        debug!(%url, "fetching resource");
        let response =
            self.transport
                .get(&url, &self.credentials.username, &self.credentials.password)?;
        if response.body.is_empty() {
            return Err(CaError::EmptyResponse { url });
        }
        Ok(self.parser.parse(&response.body)?)
    }

    /// `https://{subdomain}.freeagentcentral.com/{resource}?k=v&…`
    ///
    /// Query values pass through without URL-encoding. Callers currently only
    /// supply safe values; the tests pin this behavior down so a future fix
    /// is a deliberate one.
    fn url_for(&self, resource: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "https://{}.{}/{}",
            self.credentials.subdomain, HOST, resource
        );
        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

/// Cross-reference lookups during resolution go through the agent's own
/// cached operations, so resolving a batch of timeslips fetches projects at
/// most once and tasks at most once per project.
impl ResolveContext for Agent {
    fn project_by_id(&self, id: Id) -> CaResult<Option<Project>> {
        self.project(id)
    }

    fn tasks_for_project(&self, project_id: Id) -> CaResult<Vec<Task>> {
        self.tasks(project_id, false)
    }
}
