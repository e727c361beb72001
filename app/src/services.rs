use anyhow::Result;

/// A request/response pair handled by one of the stores.
pub trait Request {
    type Resp;
}

/// Read-only lookups, safe to call from rendering code.
pub trait Queryable<Req>
where
    Req: Request,
{
    fn query(&self, req: Req) -> Result<Req::Resp>;
}

/// State-changing operations. The stores are plain owned values, so
/// execution needs exclusive access.
pub trait Commandable<Req>
where
    Req: Request,
{
    fn execute(&mut self, req: Req) -> Result<Req::Resp>;
}
